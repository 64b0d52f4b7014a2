//! Inputs and outputs of the secret vault.
//!
//! Plaintext values only ever travel in [`SecretString`]-backed types, so they
//! are zeroed on drop and redacted from `Debug`/`Display` output.

use horizondesk_core::SecretString;
use std::fmt;

/// A decrypted secret held in memory.
///
/// Debug and Display both emit `[REDACTED]` to prevent accidental logging.
pub struct DecryptedSecret {
    name: String,
    inner: SecretString,
}

impl DecryptedSecret {
    /// Create a decrypted secret from its name and plaintext.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: SecretString::new(value),
        }
    }

    /// Name of the secret.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expose the plaintext value. Use sparingly.
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl fmt::Debug for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecryptedSecret({}: [REDACTED])", self.name)
    }
}

impl fmt::Display for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Parameters for adding a secret. `value` is plaintext and is encrypted
/// before it is stored.
#[derive(Debug, Clone)]
pub struct NewSecretInput {
    /// Display name, e.g. `DB_URL`.
    pub name: String,

    /// Free-form note.
    pub description: String,

    /// Plaintext value.
    pub value: SecretString,
}

impl NewSecretInput {
    /// Input with an empty description.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value: SecretString::new(value),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Replacement fields for an existing secret. A replacement `value` is
/// plaintext and is re-encrypted.
#[derive(Debug, Clone, Default)]
pub struct SecretEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<SecretString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypted_secret_redacted_debug() {
        let secret = DecryptedSecret::new("DB_URL", "postgres://u:p@h/db");
        assert_eq!(format!("{:?}", secret), "DecryptedSecret(DB_URL: [REDACTED])");
    }

    #[test]
    fn test_decrypted_secret_redacted_display() {
        let secret = DecryptedSecret::new("DB_URL", "postgres://u:p@h/db");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_decrypted_secret_expose() {
        let secret = DecryptedSecret::new("DB_URL", "postgres://u:p@h/db");
        assert_eq!(secret.name(), "DB_URL");
        assert_eq!(secret.expose(), "postgres://u:p@h/db");
    }

    #[test]
    fn test_new_secret_input_debug_hides_value() {
        let input = NewSecretInput::new("API_KEY", "sk-abc123").with_description("staging");
        let debug = format!("{input:?}");
        assert!(!debug.contains("sk-abc123"));
        assert!(debug.contains("staging"));
    }
}
