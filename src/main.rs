use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use podcrafter::config::{Settings, API_KEY_ENV};
use podcrafter::pipeline::{self, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "podcrafter",
    about = "Build RSS and Atom podcast feeds from keyword-filtered YouTube uploads"
)]
struct Args {
    /// Settings file (TOML, optional)
    #[arg(long, value_name = "FILE", default_value = "podcrafter.toml")]
    settings: PathBuf,

    /// Channel subscription list (JSON)
    #[arg(long, value_name = "FILE")]
    channels: Option<PathBuf>,

    /// RSS output path
    #[arg(long, value_name = "FILE")]
    rss: Option<PathBuf>,

    /// Atom output path
    #[arg(long, value_name = "FILE")]
    atom: Option<PathBuf>,

    /// Results requested per channel (1-50)
    #[arg(long, value_name = "N")]
    max_results: Option<u32>,

    /// Channels fetched at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Emit at most one episode per video even if several keywords match
    #[arg(long)]
    dedup: bool,

    /// Abort the run when any channel fails to fetch
    #[arg(long)]
    fail_fast: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(channels) = self.channels {
            settings.channels = channels;
        }
        if let Some(rss) = self.rss {
            settings.rss_path = rss;
        }
        if let Some(atom) = self.atom {
            settings.atom_path = atom;
        }
        if let Some(max_results) = self.max_results {
            settings.max_results = max_results;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if self.dedup {
            settings.allow_duplicate_matches = false;
        }
        if self.fail_fast {
            settings.fail_fast = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the episode listing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(&args.settings)
        .with_context(|| format!("Failed to load settings from {}", args.settings.display()))?;
    args.apply(&mut settings);
    tracing::debug!(settings = ?settings, "Effective settings");

    let api_key = settings.resolve_api_key(std::env::var(API_KEY_ENV).ok());
    let options = RunOptions::from(&settings);

    let report = pipeline::run(&options, api_key, &mut std::io::stdout()).await?;

    let failed: Vec<_> = report.failed_channels().collect();
    if !failed.is_empty() {
        eprintln!(
            "Warning: {} of {} channels could not be fetched and were left out of the feed:",
            failed.len(),
            report.channels.len()
        );
        for outcome in failed {
            if let Err(e) = &outcome.result {
                eprintln!("  {}: {}", outcome.channel_id, e);
            }
        }
    }

    Ok(())
}
