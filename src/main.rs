use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sift::config::CONFIG;
use sift::Index;

#[derive(Parser)]
#[command(name = "sift", about = "Positional inverted index over a document collection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a single document.
    Add {
        /// Unique document id.
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Document body; read from --body-file when omitted.
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Documents containing any of the given terms.
    Search { terms: Vec<String> },
    /// Documents containing the given terms as an exact phrase.
    Phrase { terms: Vec<String> },
    /// List the terms stored in the disk segment.
    Terms,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut index = Index::open(CONFIG.clone())?;

    match cli.command {
        Command::Add {
            id,
            title,
            body,
            body_file,
        } => {
            let body = match (body, body_file) {
                (Some(body), _) => body,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => anyhow::bail!("either --body or --body-file is required"),
            };
            index.add_document(&id, &title, &body)?;
            index.close()?;
        }
        Command::Search { terms } => {
            let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
            let results = index.free_text_query(&terms)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Phrase { terms } => {
            let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
            let results = index.phrase_query(&terms)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Terms => {
            for term in index.disk().keys()? {
                println!("{term}");
            }
        }
    }
    Ok(())
}
