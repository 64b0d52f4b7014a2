//! Secret management commands.
//!
//! Provides `horizondesk secrets add|list|reveal|update|delete` for the
//! encrypted vault, plus `generate` and `hash` helpers.

use clap::Args;
use horizondesk_core::{id, SecretString};
use horizondesk_store::Secret;
use horizondesk_vault::{
    crypto::DEFAULT_PASSWORD_LENGTH, generate_secure_password, hash_password, NewSecretInput,
    SecretEdit, SecretVault,
};

use crate::context::AppContext;

/// Secrets command arguments.
#[derive(Args)]
pub struct SecretsArgs {
    /// Prompt for the vault passphrase instead of using the environment or config
    #[arg(long, global = true)]
    pub ask_passphrase: bool,

    #[command(subcommand)]
    pub command: SecretsCommand,
}

#[derive(clap::Subcommand)]
pub enum SecretsCommand {
    /// Encrypt and store a secret (prompts for the value)
    Add {
        /// Secret name
        name: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Secret value (if omitted, prompts for hidden input)
        #[arg(long)]
        value: Option<String>,
    },

    /// List stored secrets (values stay encrypted)
    List,

    /// Decrypt and print a secret
    Reveal {
        /// Secret id or name
        target: String,
    },

    /// Change a secret's name, description, or value
    Update {
        /// Secret id or name
        target: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New value
        #[arg(long, conflicts_with = "prompt_value")]
        value: Option<String>,

        /// Prompt for a new value as hidden input
        #[arg(long)]
        prompt_value: bool,
    },

    /// Delete a secret
    Delete {
        /// Secret id or name
        target: String,
    },

    /// Print a random password
    Generate {
        /// Password length
        #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },

    /// Print the SHA-256 digest of a password (prompts if omitted)
    Hash {
        password: Option<String>,
    },
}

/// Run the secrets command.
pub async fn run(args: SecretsArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let ask = args.ask_passphrase;

    match args.command {
        SecretsCommand::Add {
            name,
            description,
            value,
        } => {
            let value = match value {
                Some(v) => v,
                None => prompt(&format!("Enter value for '{name}': "))?,
            };
            if value.is_empty() {
                anyhow::bail!("Secret value must not be empty");
            }

            let input = NewSecretInput::new(name, value).with_description(description);
            let secret = open_vault(ctx, ask)?.add(input).await?;
            println!("Secret '{}' stored ({}).", secret.name, secret.id);
        }

        SecretsCommand::List => {
            let secrets = open_vault(ctx, ask)?.list()?;
            if secrets.is_empty() {
                println!("No secrets stored.");
            } else {
                println!("{:<36} {:<24} {:<16} {}", "ID", "NAME", "FINGERPRINT", "CREATED");
                println!("{}", "-".repeat(100));
                for s in &secrets {
                    println!(
                        "{:<36} {:<24} {:<16} {}",
                        s.id,
                        s.name,
                        id::short_hash(&s.value),
                        s.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
                println!("\n{} secret(s) total.", secrets.len());
            }
        }

        SecretsCommand::Reveal { target } => {
            let vault = open_vault(ctx, ask)?;
            let secret = resolve(&vault, &target)?;
            let revealed = vault.reveal(&secret.id).await?;
            println!("{}", revealed.expose());
        }

        SecretsCommand::Update {
            target,
            name,
            description,
            value,
            prompt_value,
        } => {
            let vault = open_vault(ctx, ask)?;
            let secret = resolve(&vault, &target)?;
            let value = match (value, prompt_value) {
                (Some(v), _) => Some(v),
                (None, true) => Some(prompt(&format!("New value for '{}': ", secret.name))?),
                (None, false) => None,
            };
            let edit = SecretEdit {
                name,
                description,
                value: value.map(SecretString::new),
            };
            if vault.update(&secret.id, edit).await? {
                println!("Secret '{}' updated.", secret.name);
            } else {
                anyhow::bail!("Secret disappeared before it could be updated: {}", secret.id);
            }
        }

        SecretsCommand::Delete { target } => {
            let vault = open_vault(ctx, ask)?;
            let secret = resolve(&vault, &target)?;
            vault.delete(&secret.id)?;
            println!("Secret '{}' deleted.", secret.name);
        }

        SecretsCommand::Generate { length } => {
            if length == 0 {
                anyhow::bail!("Password length must be greater than 0");
            }
            println!("{}", generate_secure_password(length));
        }

        SecretsCommand::Hash { password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password to hash: ")?,
            };
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}

/// Open the vault, prompting for the passphrase when `ask` is set.
fn open_vault(ctx: &AppContext, ask: bool) -> anyhow::Result<SecretVault> {
    let explicit = if ask {
        Some(SecretString::new(prompt("Vault passphrase: ")?))
    } else {
        None
    };
    ctx.vault(explicit)
}

/// Find a secret by id, falling back to its name.
fn resolve(vault: &SecretVault, target: &str) -> anyhow::Result<Secret> {
    let secrets = vault.list()?;
    secrets
        .iter()
        .find(|s| s.id == target)
        .or_else(|| secrets.iter().find(|s| s.name == target))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Secret not found: {}", target))
}

fn prompt(message: &str) -> anyhow::Result<String> {
    rpassword::prompt_password(message).map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
}
