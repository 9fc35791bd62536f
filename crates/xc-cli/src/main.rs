//! xc - explain code from your terminal
//!
//! Posts a snippet to the explain server and streams the answer back,
//! refining the title and explanation live as deltas arrive. Finished
//! explanations land in a local history file.

mod language;
mod output;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use xc_core::api::{ExplainClient, ExplainRequest, DEFAULT_SERVER};
use xc_core::history::HistoryStore;
use xc_core::session::ExplainSession;

#[derive(Parser)]
#[command(name = "xc", version, about = "Explain code from your terminal, streamed")]
struct Cli {
    /// File to explain; reads stdin when omitted
    file: Option<PathBuf>,

    /// Language of the snippet; guessed from the file extension when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Explain server base URL
    #[arg(long, env = "XC_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Skip reading and writing the history file
    #[arg(long)]
    no_history: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List saved explanations, newest first
    History,
    /// Print one saved explanation
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut cli = Cli::parse();
    let store = Arc::new(open_store(cli.no_history)?);

    match cli.command.take() {
        Some(Command::History) => list_history(&store),
        Some(Command::Show { id }) => show_entry(&store, &id),
        None => explain(cli, store).await,
    }
}

fn open_store(no_history: bool) -> Result<HistoryStore> {
    if no_history {
        return Ok(HistoryStore::in_memory());
    }
    match HistoryStore::default_path() {
        Some(path) => {
            HistoryStore::load(path.clone()).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(HistoryStore::in_memory()),
    }
}

async fn explain(cli: Cli, store: Arc<HistoryStore>) -> Result<()> {
    let (code, language) = read_input(&cli)?;
    if code.trim().is_empty() {
        bail!("nothing to explain");
    }
    tracing::debug!("explaining {} bytes of {language}", code.len());

    let session = ExplainSession::new(ExplainClient::new(cli.server), store);
    let mut printer = output::StreamPrinter::new();

    let done = session
        .run(
            ExplainRequest { code, language },
            |snapshot| {
                let _ = printer.update(snapshot);
            },
            |_id| {},
        )
        .await
        .context("explanation request failed")?;

    printer.finish(&xc_core::stream::ExplanationFields {
        title: done.title,
        language: done.language,
        explanation: done.explanation,
    })?;
    Ok(())
}

fn read_input(cli: &Cli) -> Result<(String, String)> {
    match &cli.file {
        Some(path) => {
            let code = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let language = cli
                .language
                .clone()
                .unwrap_or_else(|| language::guess(path));
            Ok((code, language))
        }
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("reading stdin")?;
            let Some(language) = cli.language.clone() else {
                bail!("--language is required when reading from stdin");
            };
            Ok((code, language))
        }
    }
}

fn list_history(store: &HistoryStore) -> Result<()> {
    let entries = store.entries();
    if entries.is_empty() {
        println!("No explanations yet");
        return Ok(());
    }
    for entry in entries {
        let title = if entry.title.is_empty() {
            first_line(&entry.code)
        } else {
            entry.title.clone()
        };
        println!(
            "{}  {:10}  {}  {}",
            entry.id,
            entry.language,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            title
        );
    }
    Ok(())
}

fn show_entry(store: &HistoryStore, id: &str) -> Result<()> {
    let Some(entry) = store.get(id) else {
        bail!("no explanation with id {id}");
    };
    if !entry.title.is_empty() {
        println!("# {}\n", entry.title);
    }
    println!("{}", entry.explanation);
    Ok(())
}

/// First line of the snippet, shortened, as a title stand-in.
fn first_line(code: &str) -> String {
    let line = code.trim().lines().next().unwrap_or_default();
    if line.chars().count() > 40 {
        let short: String = line.chars().take(40).collect();
        format!("{short}...")
    } else {
        line.to_string()
    }
}
