//! Error types for the secret vault.

use horizondesk_store::StoreError;
use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The token is not base64, or too short to hold a nonce and tag.
    #[error("Malformed token: {0}")]
    Decoding(String),

    /// The authentication tag did not verify: wrong passphrase, or a
    /// corrupted or truncated token.
    #[error("Could not decrypt: wrong passphrase or corrupted token")]
    Authentication,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid key derivation parameters: {0}")]
    InvalidParams(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
