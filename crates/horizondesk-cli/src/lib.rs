//! HorizonDesk command-line interface.

pub mod commands;
pub mod context;

use clap::{Parser, Subcommand};
use horizondesk_core::config::LoggingConfig;
use horizondesk_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::context::AppContext;

/// HorizonDesk - local snippets, encrypted secrets, and assistant transcripts
#[derive(Parser)]
#[command(name = "horizondesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "HORIZONDESK_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage encrypted secrets
    Secrets(commands::secrets::SecretsArgs),

    /// Manage the snippet library
    Snippets(commands::snippets::SnippetsArgs),

    /// Record and inspect simulated command history
    History(commands::history::HistoryArgs),

    /// Inspect and append to assistant transcripts
    Chat(commands::chat::ChatArgs),

    /// Manage application settings
    Settings(commands::settings::SettingsArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Delete all stored data
    Wipe {
        /// Confirm the irreversible wipe
        #[arg(long)]
        yes: bool,

        /// Keep application settings
        #[arg(long)]
        keep_settings: bool,
    },

    /// Show version information
    Version,
}

/// Install the global tracing subscriber. Panics if one is already set.
///
/// `RUST_LOG` wins when set; otherwise the config level applies, raised by
/// each `-v`.
pub fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(verbose, logging).into());

    let json = logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn default_directive(verbose: u8, logging: &LoggingConfig) -> String {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("horizondesk={level}")
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Config(args) => commands::config::run(args, cli.config.as_deref()).await,
        Commands::Version => {
            println!("horizondesk {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let ctx = AppContext::open(config)?;
            run_with_context(command, &ctx).await
        }
    }
}

/// Run a store-backed command against an opened context.
pub async fn run_with_context(command: Commands, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        Commands::Secrets(args) => commands::secrets::run(args, ctx).await,
        Commands::Snippets(args) => commands::snippets::run(args, ctx).await,
        Commands::History(args) => commands::history::run(args, ctx).await,
        Commands::Chat(args) => commands::chat::run(args, ctx).await,
        Commands::Settings(args) => commands::settings::run(args, ctx).await,
        Commands::Wipe { yes, keep_settings } => wipe(ctx, yes, keep_settings),
        Commands::Config(_) | Commands::Version => {
            anyhow::bail!("command does not use the record store")
        }
    }
}

fn wipe(ctx: &AppContext, yes: bool, keep_settings: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete all data without --yes. This cannot be undone.");
    }

    ctx.records.clear_all()?;
    if !keep_settings {
        ctx.settings().clear()?;
    }
    tracing::info!(keep_settings, "wiped stored data");
    println!("All application data has been removed.");
    Ok(())
}
