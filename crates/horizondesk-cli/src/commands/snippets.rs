//! Snippet library commands.

use clap::Args;
use horizondesk_store::{
    category_count, filter_snippets, parse_tags, NewSnippet, Snippet, SnippetPatch, SNIPPETS,
};

use crate::context::AppContext;

/// Snippets command arguments.
#[derive(Args)]
pub struct SnippetsArgs {
    #[command(subcommand)]
    pub command: SnippetsCommand,
}

#[derive(clap::Subcommand)]
pub enum SnippetsCommand {
    /// Save a snippet
    Add {
        /// Snippet name
        name: String,

        /// Snippet source code
        #[arg(long)]
        code: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Language tag, e.g. React or Docker
        #[arg(long, default_value = "")]
        language: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// List snippets, optionally within a category
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// Search by name, description, or tag
    Search {
        query: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Print a snippet's code
    Show {
        /// Snippet id or name
        target: String,
    },

    /// Change fields of a snippet
    Update {
        /// Snippet id or name
        target: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        language: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a snippet
    Delete {
        /// Snippet id or name
        target: String,
    },
}

/// Run the snippets command.
pub async fn run(args: SnippetsArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let records = &ctx.records;

    match args.command {
        SnippetsCommand::Add {
            name,
            code,
            description,
            language,
            tags,
        } => {
            let snippet = records.add(
                SNIPPETS,
                NewSnippet {
                    name,
                    description,
                    code,
                    language,
                    tags: parse_tags(&tags),
                },
            )?;
            println!("Snippet '{}' saved ({}).", snippet.name, snippet.id);
        }

        SnippetsCommand::List { category } => {
            let snippets = records.list(SNIPPETS)?;
            print_table(&filter_snippets(&snippets, "", category.as_deref()));
            if let Some(category) = category {
                println!(
                    "{} snippet(s) in {}.",
                    category_count(&snippets, &category),
                    category
                );
            }
        }

        SnippetsCommand::Search { query, category } => {
            let snippets = records.list(SNIPPETS)?;
            let matches = filter_snippets(&snippets, &query, category.as_deref());
            print_table(&matches);
            println!("{} match(es).", matches.len());
        }

        SnippetsCommand::Show { target } => {
            let snippet = resolve(ctx, &target)?;
            println!("# {}", snippet.name);
            if !snippet.description.is_empty() {
                println!("# {}", snippet.description);
            }
            println!("{}", snippet.code);
        }

        SnippetsCommand::Update {
            target,
            name,
            code,
            description,
            language,
            tags,
        } => {
            let snippet = resolve(ctx, &target)?;
            if matches!(&name, Some(n) if n.trim().is_empty())
                || matches!(&code, Some(c) if c.trim().is_empty())
            {
                anyhow::bail!("Snippet name and code must not be empty");
            }
            let patch = SnippetPatch {
                name,
                description,
                code,
                language,
                tags: tags.as_deref().map(parse_tags),
            };
            if records.update(SNIPPETS, &snippet.id, patch)? {
                println!("Snippet '{}' updated.", snippet.name);
            } else {
                anyhow::bail!("Snippet disappeared before it could be updated: {}", snippet.id);
            }
        }

        SnippetsCommand::Delete { target } => {
            let snippet = resolve(ctx, &target)?;
            records.delete(SNIPPETS, &snippet.id)?;
            println!("Snippet '{}' deleted.", snippet.name);
        }
    }

    Ok(())
}

fn resolve(ctx: &AppContext, target: &str) -> anyhow::Result<Snippet> {
    let snippets = ctx.records.list(SNIPPETS)?;
    snippets
        .iter()
        .find(|s| s.id == target)
        .or_else(|| snippets.iter().find(|s| s.name == target))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Snippet not found: {}", target))
}

fn print_table(snippets: &[&Snippet]) {
    if snippets.is_empty() {
        println!("No snippets found.");
        return;
    }
    println!("{:<36} {:<28} {:<12} {}", "ID", "NAME", "LANGUAGE", "TAGS");
    println!("{}", "-".repeat(96));
    for s in snippets {
        println!(
            "{:<36} {:<28} {:<12} {}",
            s.id,
            s.name,
            s.language,
            s.tags.join(", ")
        );
    }
}
