//! CLI entry point for the brewlab-analytics pipeline.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use brewlab_core::config::{load_section, DEFAULT_FILE_PREFIX};
use brewlab_records::read_rows;

use brewlab_analytics::{run, AnalyticsConfig};

#[derive(Parser)]
#[command(name = "brewlab-analytics")]
#[command(about = "Derive participant metrics and clusters from Brewlab logs")]
struct Cli {
    /// JSON-lines file of round records.
    #[arg(long)]
    rounds: PathBuf,

    /// JSON-lines file of feedback records.
    #[arg(long)]
    feedback: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Config file prefix (default: brewlab).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
    config: String,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config: AnalyticsConfig = load_section(&cli.config, "analytics")?;

    let rounds = read_rows(&cli.rounds)?;
    let feedback = match &cli.feedback {
        Some(path) => read_rows(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        rounds = rounds.len(),
        feedback = feedback.len(),
        path = %cli.rounds.display(),
        "Loaded record batches"
    );

    let output = run(&rounds, &feedback, &config);
    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");

    Ok(())
}
