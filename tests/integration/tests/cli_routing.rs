//! CLI routing tests.
//!
//! These parse real argument vectors and run them through the CLI entry point
//! against a throwaway data directory, then check the effects through the
//! store and vault APIs.

use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use horizondesk_cli::{run, Cli, Commands};
use horizondesk_core::{Config, SecretString};
use horizondesk_integration_tests::{fast_cipher, file_records, TEST_KDF_ITERATIONS};
use horizondesk_vault::SecretVault;
use tempfile::TempDir;

const PASSPHRASE: &str = "cli-test";

/// Config pointing storage at `dir/data`, with cheap key derivation.
fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.dir = Some(dir.join("data"));
    config.vault.kdf_iterations = TEST_KDF_ITERATIONS;
    config.vault.passphrase = Some(SecretString::new(PASSPHRASE));
    config
}

async fn horizondesk(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("horizondesk").chain(args.iter().copied()))?;
    run(cli, test_config(dir)).await
}

#[test]
fn test_cli_version() {
    let cli = Cli::try_parse_from(["horizondesk", "version"]).unwrap();
    assert!(matches!(cli.command, Commands::Version));
}

#[test]
fn test_cli_help_lists_commands() {
    let help = Cli::command().render_help().to_string();
    for command in ["secrets", "snippets", "history", "chat", "settings", "config", "wipe"] {
        assert!(
            help.contains(command),
            "help output should mention '{}', got: {}",
            command,
            help
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(["horizondesk", "nonexistent-command"]).is_err());
}

#[tokio::test]
async fn test_cli_secret_round_trip() {
    let tmp = TempDir::new().unwrap();

    horizondesk(
        tmp.path(),
        &["secrets", "add", "DB_URL", "--value", "postgres://u:p@h/db"],
    )
    .await
    .unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("data").join("storage.json")).unwrap();
    assert!(!raw.contains("postgres://u:p@h/db"));

    horizondesk(tmp.path(), &["secrets", "reveal", "DB_URL"])
        .await
        .unwrap();
    assert!(horizondesk(tmp.path(), &["secrets", "reveal", "MISSING"])
        .await
        .is_err());

    let vault = SecretVault::new(file_records(&tmp.path().join("data")), Arc::new(fast_cipher()))
        .with_passphrase(Some(SecretString::new(PASSPHRASE)));
    let secret = vault.find_by_name("DB_URL").unwrap().unwrap();
    let revealed = vault.reveal(&secret.id).await.unwrap();
    assert_eq!(revealed.expose(), "postgres://u:p@h/db");
}

#[tokio::test]
async fn test_cli_wipe_requires_yes() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");

    horizondesk(tmp.path(), &["history", "add", "ls", "-o", "a.txt"])
        .await
        .unwrap();
    assert_eq!(file_records(&data).command_history().unwrap().len(), 1);

    assert!(horizondesk(tmp.path(), &["wipe"]).await.is_err());
    assert_eq!(file_records(&data).command_history().unwrap().len(), 1);

    horizondesk(tmp.path(), &["wipe", "--yes"]).await.unwrap();
    assert!(file_records(&data).command_history().unwrap().is_empty());
}

#[tokio::test]
async fn test_cli_config_uses_given_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("horizondesk.json5");
    let path_arg = path.to_str().unwrap();

    horizondesk(tmp.path(), &["--config", path_arg, "config", "init"])
        .await
        .unwrap();
    horizondesk(
        tmp.path(),
        &["--config", path_arg, "config", "set", "storage.history_limit", "7"],
    )
    .await
    .unwrap();

    assert_eq!(Config::load(&path).unwrap().storage.history_limit, 7);
    assert!(!tmp.path().join("data").exists());
}
