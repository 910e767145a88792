use crate::app_dirs::AppDirs;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter, e.g. `TYPEATHON_LOG=debug`
pub const LOG_ENV: &str = "TYPEATHON_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to the state-dir log file.
///
/// The terminal belongs to the TUI, so nothing is ever logged to it. Returns
/// the log path, or None when no log file could be opened; the game runs
/// without logging in that case.
pub fn init() -> Option<PathBuf> {
    let path = AppDirs::log_path()?;
    init_at(&path).ok().map(|_| path)
}

pub fn init_at(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}
