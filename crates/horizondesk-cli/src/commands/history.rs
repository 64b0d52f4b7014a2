//! Simulated terminal history commands.

use clap::Args;

use crate::context::AppContext;

/// History command arguments.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(clap::Subcommand)]
pub enum HistoryCommand {
    /// Record a command and its output lines
    Add {
        /// The command line as typed
        command: String,

        /// Output line (repeatable)
        #[arg(short, long = "output")]
        output: Vec<String>,
    },

    /// Show recorded commands, oldest first
    List {
        /// Show only the most recent N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Include output lines
        #[arg(long)]
        full: bool,
    },
}

/// Run the history command.
pub async fn run(args: HistoryArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match args.command {
        HistoryCommand::Add { command, output } => {
            if command.trim().is_empty() {
                anyhow::bail!("Command must not be empty");
            }
            let entry = ctx.records.add_command_history(command, output)?;
            tracing::debug!(id = %entry.id, "recorded command");
            println!("Recorded '{}'.", entry.command);
        }

        HistoryCommand::List { limit, full } => {
            let history = ctx.records.command_history()?;
            if history.is_empty() {
                println!("No commands recorded.");
                return Ok(());
            }

            let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
            for entry in &history[skip..] {
                println!(
                    "{}  $ {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.command
                );
                if full {
                    for line in &entry.output {
                        println!("    {line}");
                    }
                }
            }
        }
    }

    Ok(())
}
