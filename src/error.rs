use std::path::PathBuf;

/// Errors surfaced by the typing core and its word/config plumbing
#[derive(Debug, thiserror::Error)]
pub enum TypingError {
    /// A word batch was requested from a pool with no candidate words
    #[error("word pool is empty")]
    EmptyPool,

    #[error("unable to read word list {}: {source}", .path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TypingError>;
