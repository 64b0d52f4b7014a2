//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default prefix shared by every persisted key.
pub const DEFAULT_KEY_PREFIX: &str = "horizondesk_";

/// Number of command-history entries kept before the oldest are evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// PBKDF2 iteration count used to derive vault keys.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Main HorizonDesk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Record storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Secret vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `storage.json` (defaults to `~/.horizondesk/data`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Prefix prepended to every collection name to form its storage key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Report corrupt collections as errors instead of reading them as empty.
    #[serde(default)]
    pub strict_decoding: bool,

    /// Maximum number of retained command-history entries.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key_prefix: default_key_prefix(),
            strict_decoding: false,
            history_limit: default_history_limit(),
        }
    }
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Vault configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Passphrase used when the caller supplies none. Falls back to the
    /// built-in default passphrase when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<SecretString>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            passphrase: None,
        }
    }
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
