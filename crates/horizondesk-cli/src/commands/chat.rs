//! Assistant transcript commands.
//!
//! The console and the floating widget keep separate transcripts; `--widget`
//! selects the latter.

use clap::Args;
use horizondesk_store::{ChatMessage, NewChatMessage, Sender};

use crate::context::AppContext;

/// Chat command arguments.
#[derive(Args)]
pub struct ChatArgs {
    /// Use the widget transcript instead of the console one
    #[arg(long, global = true)]
    pub widget: bool,

    #[command(subcommand)]
    pub command: ChatCommand,
}

#[derive(clap::Subcommand)]
pub enum ChatCommand {
    /// Print the transcript
    List,

    /// Append a message to the transcript
    Say {
        content: String,

        /// Record the message as an assistant reply
        #[arg(long)]
        assistant: bool,

        /// Mark the content as source code
        #[arg(long)]
        code: bool,
    },
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let records = &ctx.records;

    match args.command {
        ChatCommand::List => {
            let messages = if args.widget {
                records.widget_messages()?
            } else {
                records.console_messages()?
            };
            if messages.is_empty() {
                println!("No messages.");
            }
            for message in &messages {
                print_message(message);
            }
        }

        ChatCommand::Say {
            content,
            assistant,
            code,
        } => {
            if content.trim().is_empty() {
                anyhow::bail!("Message must not be empty");
            }
            let mut message = if assistant {
                NewChatMessage::assistant(content)
            } else {
                NewChatMessage::user(content)
            };
            if code {
                message = message.code();
            }

            let saved = if args.widget {
                records.save_widget_message(message)?
            } else {
                records.save_console_message(message)?
            };
            print_message(&saved);
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "assistant",
    };
    println!("[{}] {}:", message.timestamp.format("%H:%M:%S"), who);
    if message.is_code == Some(true) {
        println!("```\n{}\n```", message.content);
    } else {
        println!("{}", message.content);
    }
    if let Some(actions) = &message.actions {
        for action in actions {
            println!("  -> {} ({})", action.label, action.command);
        }
    }
}
