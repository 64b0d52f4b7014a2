//! AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation.
//!
//! Keys are derived from a passphrase and a fixed application salt, so the
//! same passphrase always yields the same key. A fresh random nonce is
//! prepended to every ciphertext, and the whole `nonce || ciphertext || tag`
//! is base64-encoded into one token.

use std::fmt;
use std::num::NonZeroU32;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use horizondesk_core::config::{VaultConfig, DEFAULT_KDF_ITERATIONS};
use horizondesk_core::SecretString;
use rand::RngCore;
use ring::pbkdf2;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;
const KEY_SIZE: usize = 32;

/// Fixed salt mixed into every key derivation.
const KDF_SALT: &[u8] = b"horizondesk-salt";

/// Passphrase used when the caller supplies none.
pub const DEFAULT_PASSPHRASE: &str = "horizondesk-default";

/// Symbols used by [`generate_secure_password`].
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Default length of generated passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 32;

/// Key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: NonZeroU32,
}

impl KdfParams {
    /// Parameters with the given PBKDF2 iteration count.
    pub fn new(iterations: u32) -> Result<Self> {
        let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
            VaultError::InvalidParams("iteration count must be greater than 0".to_string())
        })?;
        Ok(Self { iterations })
    }

    /// PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::new(DEFAULT_KDF_ITERATIONS).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// A derived AES-256 key. Zeroed on drop; the bytes never leave this module.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; KEY_SIZE],
}

impl VaultKey {
    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.bytes))
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey([REDACTED])")
    }
}

fn derive(passphrase: &str, params: KdfParams) -> VaultKey {
    let mut bytes = [0u8; KEY_SIZE];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        params.iterations,
        KDF_SALT,
        passphrase.as_bytes(),
        &mut bytes,
    );
    VaultKey { bytes }
}

/// Encrypt `plaintext` under `key` into a base64 token.
///
/// Every call draws a new nonce, so equal plaintexts give different tokens.
pub fn encrypt_with_key(key: &VaultKey, plaintext: &str) -> Result<String> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let ciphertext = key
        .cipher()
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(combined))
}

/// Decrypt a token produced by [`encrypt_with_key`].
///
/// Fails with [`VaultError::Decoding`] when the token is not base64 or is
/// too short, and with [`VaultError::Authentication`] when the tag does not
/// verify. No plaintext is returned unless the tag verifies.
pub fn decrypt_with_key(key: &VaultKey, token: &str) -> Result<String> {
    let combined = STANDARD
        .decode(token.trim())
        .map_err(|e| VaultError::Decoding(format!("token is not valid base64: {e}")))?;

    if combined.len() < NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::Decoding(format!(
            "token holds {} bytes, need at least {}",
            combined.len(),
            NONCE_SIZE + TAG_SIZE
        )));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
    let plaintext = key
        .cipher()
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| VaultError::Authentication)?;

    String::from_utf8(plaintext)
        .map_err(|e| VaultError::Decoding(format!("plaintext is not UTF-8: {e}")))
}

/// Asynchronous encryption seam used by the vault.
///
/// `passphrase` of `None` selects the implementation's default passphrase.
#[async_trait]
pub trait SecretCipher: Send + Sync {
    /// Encrypt `plaintext` into an opaque token.
    async fn encrypt(&self, plaintext: &str, passphrase: Option<&str>) -> Result<String>;

    /// Decrypt a token produced by [`SecretCipher::encrypt`].
    async fn decrypt(&self, token: &str, passphrase: Option<&str>) -> Result<String>;
}

/// Passphrase-based AES-256-GCM cipher.
///
/// Key derivation is deliberately slow and runs on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoService {
    params: KdfParams,
}

impl CryptoService {
    /// Service with the default parameters (100 000 iterations).
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with explicit parameters.
    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }

    /// Service configured from the `vault` config section.
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        Ok(Self::with_params(KdfParams::new(config.kdf_iterations)?))
    }

    /// Parameters in effect.
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Derive the key for `passphrase` on the current thread.
    pub fn derive_key(&self, passphrase: &str) -> VaultKey {
        derive(passphrase, self.params)
    }

    /// Derive the key for `passphrase` (or the default) off the async runtime.
    pub async fn derive_key_async(&self, passphrase: Option<&str>) -> Result<VaultKey> {
        let passphrase = SecretString::new(passphrase.unwrap_or(DEFAULT_PASSPHRASE));
        let params = self.params;
        debug!(iterations = params.iterations(), "deriving vault key");
        tokio::task::spawn_blocking(move || derive(passphrase.expose_secret(), params))
            .await
            .map_err(|e| VaultError::Encryption(format!("key derivation task failed: {e}")))
    }
}

#[async_trait]
impl SecretCipher for CryptoService {
    async fn encrypt(&self, plaintext: &str, passphrase: Option<&str>) -> Result<String> {
        let key = self.derive_key_async(passphrase).await?;
        encrypt_with_key(&key, plaintext)
    }

    async fn decrypt(&self, token: &str, passphrase: Option<&str>) -> Result<String> {
        let key = self.derive_key_async(passphrase).await?;
        decrypt_with_key(&key, token)
    }
}

/// Random password of `length` symbols from an 88-symbol alphabet.
///
/// Each random byte is reduced modulo 88, so the first 80 symbols are
/// slightly more likely than the last 8 (3/256 versus 2/256). That bias is
/// accepted for generated passwords.
pub fn generate_secure_password(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);

    let password = bytes
        .iter()
        .map(|b| PASSWORD_CHARSET[*b as usize % PASSWORD_CHARSET.len()] as char)
        .collect();
    bytes.zeroize();
    password
}

/// Unsalted SHA-256 of `password`, lowercase hex.
///
/// Fine for integrity checks; not for storing credentials.
pub fn hash_password(password: &str) -> String {
    horizondesk_core::id::sha256(password)
}
