//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use horizondesk_core::config::Config;
use horizondesk_core::SecretString;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("horizondesk.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.storage.key_prefix, config.storage.key_prefix);
    assert_eq!(loaded.storage.history_limit, config.storage.history_limit);
    assert_eq!(loaded.vault.kdf_iterations, config.vault.kdf_iterations);
    assert!(loaded.vault.passphrase.is_none());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("horizondesk.json5");

    let mut config = Config::default();
    config.storage.history_limit = 20;
    config.storage.strict_decoding = true;
    config.vault.passphrase = Some(SecretString::new("correct horse"));
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.storage.history_limit, 20);
    assert!(loaded.storage.strict_decoding);
    assert_eq!(
        loaded.vault.passphrase.as_ref().map(SecretString::expose_secret),
        Some("correct horse")
    );
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/horizondesk.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
