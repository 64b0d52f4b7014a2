//! Shared state for commands that touch the record store.

use std::path::PathBuf;
use std::sync::Arc;

use horizondesk_core::{Config, SecretString};
use horizondesk_store::{FileStorage, RecordStore, SettingsStore, StoreOptions};
use horizondesk_vault::{resolve_passphrase, CryptoService, SecretVault};
use tracing::debug;

/// Loaded configuration plus the store it points at.
pub struct AppContext {
    pub config: Config,
    pub records: RecordStore,
}

impl AppContext {
    /// Open the file-backed store described by `config`.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

        let dir = config.storage_dir()?;
        let storage = FileStorage::open_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to open storage in {}: {}", dir.display(), e))?;
        debug!(path = %storage.path().display(), "opened record storage");

        let records = RecordStore::with_options(
            Arc::new(storage),
            StoreOptions::from(&config.storage),
        );
        Ok(Self { config, records })
    }

    /// Directory holding the storage file.
    pub fn storage_dir(&self) -> anyhow::Result<PathBuf> {
        Ok(self.config.storage_dir()?)
    }

    /// Settings sharing this store's namespace.
    pub fn settings(&self) -> SettingsStore {
        SettingsStore::for_records(&self.records)
    }

    /// Vault over this store, with the passphrase resolved from `explicit`,
    /// the environment, or the config.
    pub fn vault(&self, explicit: Option<SecretString>) -> anyhow::Result<SecretVault> {
        let cipher = CryptoService::from_config(&self.config.vault)?;
        let passphrase = resolve_passphrase(explicit, &self.config.vault);
        Ok(SecretVault::new(self.records.clone(), Arc::new(cipher)).with_passphrase(passphrase))
    }
}
