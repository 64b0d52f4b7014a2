//! Application settings commands.

use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;

/// Settings command arguments.
#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(clap::Subcommand)]
pub enum SettingsCommand {
    /// Show all settings
    Show,

    /// Get a setting
    Get {
        /// Setting key (dot-separated camelCase path, e.g. codeEditor.fontSize)
        key: String,
    },

    /// Set a setting
    Set {
        /// Setting key
        key: String,

        /// Value to set
        value: String,
    },

    /// Restore the defaults
    Reset,

    /// Write settings as JSON to a file, or stdout
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace settings with a JSON document
    Import {
        /// File to read
        path: PathBuf,
    },
}

/// Run the settings command.
pub async fn run(args: SettingsArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.settings();

    match args.command {
        SettingsCommand::Show => {
            println!("{}", store.export()?);
        }

        SettingsCommand::Get { key } => {
            let json = serde_json::to_value(store.load()?)?;
            let value = key
                .split('.')
                .fold(Some(&json), |acc, k| acc.and_then(|v| v.get(k)));

            match value {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Unknown setting: {}", key),
            }
        }

        SettingsCommand::Set { key, value } => {
            let mut settings = store.load()?;
            settings.set_path(&key, &value)?;
            store.save(&settings)?;
            println!("Set {} = {}", key, value);
        }

        SettingsCommand::Reset => {
            store.reset()?;
            println!("Settings restored to defaults.");
        }

        SettingsCommand::Export { output } => {
            let json = store.export()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported settings to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        SettingsCommand::Import { path } => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            store
                .import(&content)
                .map_err(|e| anyhow::anyhow!("Invalid settings file: {}", e))?;
            println!("Imported settings from {}", path.display());
        }
    }

    Ok(())
}
