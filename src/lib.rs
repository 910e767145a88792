// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod round_stats;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod ui;
pub mod words;

pub use error::{Result, TypingError};
