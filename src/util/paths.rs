//! Path utilities for statesnap data directories

use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Pin the data directory for this process. `None` keeps ~/.statesnap.
/// The first call wins.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    if let Some(path) = custom_path {
        let _ = DATA_DIR.set(path);
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".statesnap"))
        .unwrap_or_else(|| PathBuf::from(".statesnap"))
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// ~/.statesnap/logs
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// ~/.statesnap/logs/statesnap.log
pub fn log_file_path() -> PathBuf {
    logs_dir().join("statesnap.log")
}

/// ~/.statesnap/config.toml
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
