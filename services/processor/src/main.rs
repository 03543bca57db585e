//! cvdp-process: normalize CVDP JSONL dumps into the explorer's static data set.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::{AppConfig, Args};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout is reserved for the result line
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = AppConfig::from_args(&args)?;

    info!("Input dir: {}", cfg.input_dir.display());
    info!("Output dir: {}", cfg.output_dir.display());

    let summary = cvdp::process_all(&cfg.input_dir, &cfg.output_dir).with_context(|| {
        format!("Failed to process CVDP data from {}", cfg.input_dir.display())
    })?;

    info!(
        "{} records from {} files ({} datasets)",
        summary.stats.record_count, summary.files_processed, summary.stats.dataset_count
    );
    println!("Processed data written to {}", summary.output_dir.display());
    Ok(())
}
