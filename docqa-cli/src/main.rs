mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::{App, BackendArgs};

#[derive(Parser)]
#[command(
    name = "docqa",
    about = "Ask questions about a folder of PDFs and get page citations",
    version
)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// Output format for answers
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Index every PDF in a directory into the collection
    Index {
        /// Directory holding the PDFs (created if missing)
        #[arg(env = "DOCQA_PDF_DIR", default_value = "pdfs")]
        dir: PathBuf,
    },

    /// Answer a single question and exit
    Ask {
        /// The question; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Ask questions interactively until `exit`, `quit` or EOF
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::new(&cli.backend)?;

    match cli.command {
        Command::Index { dir } => commands::index::run(&app, &dir).await?,
        Command::Ask { question } => {
            commands::ask::run(&app, &question.join(" "), cli.format).await?;
        }
        Command::Chat => commands::chat::run(&app, cli.format).await?,
    }

    Ok(())
}
