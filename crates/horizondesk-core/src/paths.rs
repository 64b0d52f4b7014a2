//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the HorizonDesk base directory (~/.horizondesk).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".horizondesk"))
}

/// Get the main config file path (~/.horizondesk/horizondesk.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("horizondesk.json5"))
}

/// Get the default data directory (~/.horizondesk/data).
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("data"))
}

/// Get the key-value storage file inside `dir`.
pub fn storage_file(dir: &std::path::Path) -> PathBuf {
    dir.join("storage.json")
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
