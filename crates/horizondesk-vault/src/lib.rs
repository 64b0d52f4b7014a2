//! Encrypted secret vault for HorizonDesk.
//!
//! Secret values are encrypted with AES-256-GCM under a key derived from a
//! passphrase (PBKDF2-HMAC-SHA256, fixed salt) before they reach the record
//! store, and only decrypted on explicit request.

pub mod crypto;
pub mod error;
pub mod passphrase;
pub mod types;
pub mod vault;

pub use crypto::{
    generate_secure_password, hash_password, CryptoService, KdfParams, SecretCipher, VaultKey,
};
pub use error::{Result, VaultError};
pub use passphrase::resolve_passphrase;
pub use types::{DecryptedSecret, NewSecretInput, SecretEdit};
pub use vault::SecretVault;
