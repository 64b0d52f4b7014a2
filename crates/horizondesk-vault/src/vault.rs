//! Secret vault: encrypt on write, decrypt on explicit reveal.
//!
//! [`SecretVault`] sits between callers holding plaintext and the `secrets`
//! collection, which only ever sees ciphertext tokens.

use std::sync::Arc;

use horizondesk_core::SecretString;
use horizondesk_store::{NewSecret, RecordStore, Secret, SecretPatch, StoreError, SECRETS};
use tracing::{debug, warn};

use crate::crypto::SecretCipher;
use crate::error::{Result, VaultError};
use crate::types::{DecryptedSecret, NewSecretInput, SecretEdit};

/// Encrypted secret storage over a [`RecordStore`].
#[derive(Clone)]
pub struct SecretVault {
    records: RecordStore,
    cipher: Arc<dyn SecretCipher>,
    passphrase: Option<SecretString>,
}

impl SecretVault {
    /// Create a vault using the cipher's default passphrase.
    pub fn new(records: RecordStore, cipher: Arc<dyn SecretCipher>) -> Self {
        Self {
            records,
            cipher,
            passphrase: None,
        }
    }

    /// Use `passphrase` (or the cipher default, if `None`) for every operation.
    pub fn with_passphrase(mut self, passphrase: Option<SecretString>) -> Self {
        self.passphrase = passphrase;
        self
    }

    fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(SecretString::expose_secret)
    }

    /// Encrypt and store a new secret, returning the stored record.
    pub async fn add(&self, input: NewSecretInput) -> Result<Secret> {
        if input.name.trim().is_empty() || input.value.is_empty() {
            return Err(VaultError::Validation(
                "name and value are required".to_string(),
            ));
        }

        let token = self
            .cipher
            .encrypt(input.value.expose_secret(), self.passphrase())
            .await?;

        let secret = self.records.add(
            SECRETS,
            NewSecret {
                name: input.name,
                description: input.description,
                value: token,
            },
        )?;
        debug!(id = %secret.id, name = %secret.name, "stored secret");
        Ok(secret)
    }

    /// Stored secrets, oldest first. Values are ciphertext tokens.
    pub fn list(&self) -> Result<Vec<Secret>> {
        Ok(self.records.list(SECRETS)?)
    }

    /// First secret with the given name, if any.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Secret>> {
        Ok(self.list()?.into_iter().find(|s| s.name == name))
    }

    /// Decrypt the secret with `id`.
    pub async fn reveal(&self, id: &str) -> Result<DecryptedSecret> {
        let secret = self.records.get(SECRETS, id).map_err(|e| match e {
            StoreError::NotFound(id) => VaultError::NotFound(id),
            other => VaultError::Store(other),
        })?;

        match self.cipher.decrypt(&secret.value, self.passphrase()).await {
            Ok(plaintext) => Ok(DecryptedSecret::new(secret.name, plaintext)),
            Err(e) => {
                warn!(id, "could not decrypt secret: {e}");
                Err(e)
            }
        }
    }

    /// Apply `edit` to the secret with `id`, re-encrypting a replaced value.
    ///
    /// Returns `false` when no secret has that id.
    pub async fn update(&self, id: &str, edit: SecretEdit) -> Result<bool> {
        let value = match &edit.value {
            Some(value) if value.is_empty() => {
                return Err(VaultError::Validation("value must not be empty".to_string()))
            }
            Some(value) => Some(
                self.cipher
                    .encrypt(value.expose_secret(), self.passphrase())
                    .await?,
            ),
            None => None,
        };

        let patch = SecretPatch {
            name: edit.name,
            description: edit.description,
            value,
        };
        Ok(self.records.update(SECRETS, id, patch)?)
    }

    /// Remove the secret with `id`. Returns `false` when absent.
    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.delete(SECRETS, id)?)
    }
}
