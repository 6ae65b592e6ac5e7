//! CLI entry point for the brewlab-game session engine.
//!
//! `play` reads one JSON event per line from stdin and writes one JSON
//! snapshot per line to stdout. Logs go to stderr.

use std::io::{BufRead, Write};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use brewlab_core::config::{load_section, DEFAULT_FILE_PREFIX};
use brewlab_core::{catalog, ScenarioId};
use brewlab_game::{resolver, Event, GameConfig, GameDriver};
use brewlab_records::JsonlRecordStore;

#[derive(Parser)]
#[command(name = "brewlab-game")]
#[command(about = "Fermentation troubleshooting game engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: brewlab).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX, global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Print the scenario catalog as JSON.
    Catalog,
    /// Print the shortest action sequence from a scenario to the baseline.
    Solve {
        /// Starting scenario id.
        #[arg(long, default_value_t = ScenarioId::GAME_START.get())]
        scenario: u8,
    },
    /// Play a session from JSON events on stdin.
    Play,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Catalog => {
            println!("{}", serde_json::to_string(catalog::all())?);
        }
        Command::Solve { scenario } => {
            let start = ScenarioId::new(scenario)?;
            let path = resolver::solution_path(start);
            println!(
                "{}",
                serde_json::json!({ "scenario": start, "path": path })
            );
        }
        Command::Play => {
            let config: GameConfig = load_section(&cli.config, "game")?;
            play(config)?;
        }
    }

    Ok(())
}

fn play(config: GameConfig) -> anyhow::Result<()> {
    let store = JsonlRecordStore::new(&config.log_dir)?;
    tracing::info!(log_dir = %config.log_dir, "Recording to JSON-lines store");

    let mut driver = GameDriver::new(store).with_config(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Event>(&line) {
            Ok(event) => match driver.handle(event, Utc::now()) {
                Ok(outcome) => serde_json::json!({ "outcome": outcome, "view": driver.view() }),
                Err(e) => serde_json::json!({ "error": e.to_string(), "view": driver.view() }),
            },
            Err(e) => serde_json::json!({ "error": format!("invalid event: {e}") }),
        };
        writeln!(out, "{reply}")?;
    }

    Ok(())
}
