//! Vault passphrase resolution.
//!
//! The passphrase is resolved in priority order:
//! 1. An explicit passphrase (e.g. a CLI flag)
//! 2. `HORIZONDESK_PASSPHRASE` environment variable
//! 3. `vault.passphrase` in the config file
//! 4. None, letting the cipher fall back to its built-in default

use horizondesk_core::config::VaultConfig;
use horizondesk_core::SecretString;
use tracing::debug;

/// Environment variable holding the vault passphrase.
pub const PASSPHRASE_ENV: &str = "HORIZONDESK_PASSPHRASE";

/// Resolve the passphrase to use, reading the environment.
pub fn resolve_passphrase(
    explicit: Option<SecretString>,
    config: &VaultConfig,
) -> Option<SecretString> {
    resolve_from(explicit, std::env::var(PASSPHRASE_ENV).ok(), config)
}

fn resolve_from(
    explicit: Option<SecretString>,
    env: Option<String>,
    config: &VaultConfig,
) -> Option<SecretString> {
    if let Some(passphrase) = explicit.filter(|p| !p.is_empty()) {
        debug!("using explicit vault passphrase");
        return Some(passphrase);
    }

    if let Some(value) = env.filter(|v| !v.is_empty()) {
        debug!("using vault passphrase from {PASSPHRASE_ENV}");
        return Some(SecretString::new(value));
    }

    if let Some(passphrase) = config.passphrase.clone().filter(|p| !p.is_empty()) {
        debug!("using vault passphrase from config");
        return Some(passphrase);
    }

    debug!("no vault passphrase configured, using built-in default");
    None
}
