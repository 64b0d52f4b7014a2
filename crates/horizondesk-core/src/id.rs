//! ID generation and hashing utilities.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a new UUID v4 (122 random bits).
pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a SHA256 hash of the input, lowercase hex.
pub fn sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a short hash (first 16 characters of SHA256).
pub fn short_hash(input: &str) -> String {
    sha256(input)[..16].to_string()
}
