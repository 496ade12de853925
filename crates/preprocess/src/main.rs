mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use ingest::CorpusAggregator;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // Resolve and validate everything before touching the corpus
    let config = cli.resolve_config()?;
    let pipeline = config.into_pipeline();
    let aggregator =
        CorpusAggregator::new(pipeline).context("Invalid preprocessing configuration")?;

    tracing::info!(
        level = %aggregator.config().level,
        folders = aggregator.config().input_folders.len(),
        output = %cli.output_file.display(),
        "Starting preprocessing"
    );

    let corpus = aggregator.run().context("Failed to aggregate corpus")?;

    export::write_parquet(&corpus.rows, &cli.output_file)
        .with_context(|| format!("Failed to write dataset to {:?}", cli.output_file))?;

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&corpus.stats)?);
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
