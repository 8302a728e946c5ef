//! taskbook
//!
//! Hierarchical task manager with a JSON command protocol and an
//! interactive shell on top of it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use taskbook::commands::CommandHandler;
use taskbook::config::Config;
use taskbook::db::Database;
use taskbook::shell;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskbook", version, about = "Hierarchical task manager")]
struct Cli {
    /// Path to the SQLite database (overrides config and environment)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive shell (default)
    Shell,
    /// Dispatch a single JSON command payload and print the envelope
    Exec {
        /// Payload, e.g. '{"command":"add","title":"Buy milk"}'
        payload: String,
    },
}

fn init_logging() {
    // Shell output goes to stdout; diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    if let Some(db_path) = cli.db {
        config.db_path = db_path;
    }
    config.ensure_db_dir()?;

    let db = Database::open(&config.db_path)?;
    info!(db_path = %config.db_path.display(), "database opened");

    let handler = CommandHandler::new(db);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(&handler)?,
        Command::Exec { payload } => {
            let payload: Value = serde_json::from_str(&payload)?;
            let result = handler.dispatch(&payload);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
