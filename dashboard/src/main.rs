mod commands;
mod config;
mod models;
mod render;
mod state;

use clap::{Parser, Subcommand};
use config::Config;
use log::info;
use models::context::Context;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dashboard", about = "Browse the character catalog from the terminal")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "dashboard.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of characters, e.g. `list '?page=2&status=alive'`
    List {
        #[arg(default_value = "")]
        location: String,
    },
    /// Print one character and the episodes it appears in
    Show { id: u32 },
    /// Read search text and `:` commands from stdin, one per line
    Search {
        #[arg(default_value = "")]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    TermLogger::init(
        config.level_filter(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    info!("Loaded configuration from {}", cli.config.display());

    let context = Arc::new(Context::new(config));

    match cli.command {
        Command::List { location } => commands::list(context, &location).await,
        Command::Show { id } => commands::show(context, id).await?,
        Command::Search { location } => commands::search(context, &location).await?,
    }

    Ok(())
}
