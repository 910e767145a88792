use crate::error::{Result, TypingError};
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

static WORDLIST_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/wordlists");

/// Word lists compiled into the binary
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BundledList {
    #[default]
    English,
    Code,
}

impl BundledList {
    pub fn words(&self) -> Result<Vec<String>> {
        let file_name = format!("{}.txt", self.to_string().to_lowercase());
        let contents = WORDLIST_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| TypingError::WordList {
                path: file_name.clone().into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not bundled"),
            })?;

        Ok(parse_words(contents))
    }
}

/// Split a word list into words. Any whitespace separates words, so one word
/// per line and space-separated lists both work and no word carries a space.
pub fn parse_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Read an external word list, one word per line
pub fn load_word_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TypingError::WordList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_words(&text))
}

/// The words shown for one round, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSequence {
    words: Vec<String>,
}

impl TargetSequence {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words joined by single spaces, no trailing space
    pub fn flatten(&self) -> String {
        self.words.join(" ")
    }

    /// Length of [`flatten`](Self::flatten) in chars
    pub fn flattened_len(&self) -> usize {
        let letters: usize = self.words.iter().map(|w| w.chars().count()).sum();
        letters + self.words.len().saturating_sub(1)
    }
}

/// Pick `count` words uniformly at random from `pool`, with replacement.
pub fn generate<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Result<TargetSequence> {
    if pool.is_empty() {
        return Err(TypingError::EmptyPool);
    }
    if count == 0 {
        return Err(TypingError::InvalidConfig(
            "word count must be positive".to_string(),
        ));
    }

    let words = (0..count)
        .map(|_| pool[rng.gen_range(0..pool.len())].clone())
        .collect();

    Ok(TargetSequence::new(words))
}

/// Produces a fresh [`TargetSequence`] for every round from a fixed pool
#[derive(Debug, Clone)]
pub struct WordBatchGenerator {
    pool: Vec<String>,
    count: usize,
}

impl WordBatchGenerator {
    pub fn new(pool: Vec<String>, count: usize) -> Self {
        Self { pool, count }
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn next_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TargetSequence> {
        generate(&self.pool, self.count, rng)
    }
}
