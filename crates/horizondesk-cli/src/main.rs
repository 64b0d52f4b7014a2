//! HorizonDesk CLI entry point.

use clap::Parser;
use horizondesk_cli::{init_logging, run, Cli};
use horizondesk_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let config = Config::load_or_default_from(cli.config.as_deref());
    init_logging(cli.verbose, &config.logging);

    // Run the command
    run(cli, config).await
}
