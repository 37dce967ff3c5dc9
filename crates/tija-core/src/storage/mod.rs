mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, FocusConfig, InsightsConfig, PreferencesConfig};
pub use database::{Database, TRACKER_STATE_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tija[-dev]/` based on TIJA_ENV, or TIJA_DATA_DIR when
/// that is set.
///
/// Set TIJA_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIJA_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIJA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tija-dev")
            } else {
                base_dir.join("tija")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
