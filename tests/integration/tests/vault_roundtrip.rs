//! End-to-end vault tests over file-backed storage.
//!
//! A secret written by one process must be readable by the next one that
//! opens the same directory with the same passphrase, and by nobody else.

use std::sync::Arc;

use horizondesk_core::SecretString;
use horizondesk_integration_tests::{fast_cipher, file_records};
use horizondesk_store::SECRETS;
use horizondesk_vault::{NewSecretInput, SecretEdit, SecretVault, VaultError};
use tempfile::TempDir;

fn open_vault(dir: &TempDir, passphrase: Option<&str>) -> SecretVault {
    SecretVault::new(file_records(dir.path()), Arc::new(fast_cipher()))
        .with_passphrase(passphrase.map(SecretString::new))
}

#[tokio::test]
async fn test_secret_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let id = {
        let vault = open_vault(&dir, None);
        vault
            .add(NewSecretInput::new("DB_URL", "postgres://u:p@h/db").with_description("primary"))
            .await
            .unwrap()
            .id
    };

    let reopened = open_vault(&dir, None);
    let listed = reopened.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "DB_URL");
    assert_eq!(listed[0].description, "primary");

    let revealed = reopened.reveal(&id).await.unwrap();
    assert_eq!(revealed.name(), "DB_URL");
    assert_eq!(revealed.expose(), "postgres://u:p@h/db");
}

#[tokio::test]
async fn test_file_never_contains_plaintext() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir, Some("pw"));
    vault
        .add(NewSecretInput::new("API_KEY", "sk-live-abcdef"))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("storage.json")).unwrap();
    assert!(raw.contains("API_KEY"));
    assert!(!raw.contains("sk-live-abcdef"));
}

#[tokio::test]
async fn test_wrong_passphrase_cannot_reveal() {
    let dir = TempDir::new().unwrap();
    let secret = open_vault(&dir, Some("right"))
        .add(NewSecretInput::new("TOKEN", "abc"))
        .await
        .unwrap();

    let result = open_vault(&dir, Some("wrong")).reveal(&secret.id).await;
    assert!(matches!(result, Err(VaultError::Authentication)));
}

#[tokio::test]
async fn test_update_then_delete_persist() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir, None);
    let secret = vault.add(NewSecretInput::new("TOKEN", "v1")).await.unwrap();

    let edit = SecretEdit {
        value: Some(SecretString::new("v2")),
        ..Default::default()
    };
    assert!(vault.update(&secret.id, edit).await.unwrap());
    assert_eq!(
        open_vault(&dir, None).reveal(&secret.id).await.unwrap().expose(),
        "v2"
    );

    assert!(vault.delete(&secret.id).unwrap());
    assert!(!vault.delete(&secret.id).unwrap());

    assert!(file_records(dir.path()).list(SECRETS).unwrap().is_empty());
}
