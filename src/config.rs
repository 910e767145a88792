use crate::app_dirs::AppDirs;
use crate::error::{Result, TypingError};
use crate::session::{SessionConfig, ROUND_DURATION_SECS, TOTAL_WORDS};
use crate::words::{load_word_file, BundledList};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persisted game settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub number_of_words: usize,
    pub number_of_secs: u32,
    pub word_list: BundledList,
    /// External word list, one word per line; takes precedence over `word_list`
    pub words_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_words: TOTAL_WORDS,
            number_of_secs: ROUND_DURATION_SECS,
            word_list: BundledList::default(),
            words_file: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> Result<SessionConfig> {
        SessionConfig::new(self.number_of_words, self.number_of_secs)
    }

    /// The candidate pool for word batches
    pub fn load_words(&self) -> Result<Vec<String>> {
        let words = match &self.words_file {
            Some(path) => load_word_file(path)?,
            None => self.word_list.words()?,
        };
        if words.is_empty() {
            return Err(TypingError::EmptyPool);
        }
        Ok(words)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => warn!(path = %self.path.display(), %err, "ignoring unreadable config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
