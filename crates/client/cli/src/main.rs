//! Arena simulator entry point.
//!
//! Loads the balance sheet and decks from a content directory and runs
//! battles against an in-memory store. Run with: `arena-sim <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Battle, Inspect};

/// Card arena simulator
#[derive(Parser)]
#[command(name = "arena-sim")]
#[command(about = "Simulate card arena battles from content files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fight and settle one battle, printing the result
    Battle(Battle),

    /// Show card and deck power for a deck file
    Inspect(Inspect),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Battle(cmd) => cmd.execute(),
        Command::Inspect(cmd) => cmd.execute(),
    }
}
