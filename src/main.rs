mod config;
mod engine;
mod export;
mod models;
mod parser;
mod resolver;

use std::io::stderr;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::engine::ImportEngine;
use crate::export::write_activities;
use crate::parser::read_records;
use crate::resolver::LookupClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    setup_logging(config.log_level);

    let records = read_records(&config.input_path)?;
    info!("Read {} records from [{}]", records.len(), config.input_path.display());

    // One credential per run, fetched before the loop. Any failure from here
    // on aborts without touching the output path.
    let resolver = LookupClient::connect(&config.api_url, &config.api_secret).await?;

    let engine = ImportEngine::new(&config, &resolver);
    let outcome = engine.run(records).await?;

    write_activities(&config.output_path, &outcome.activities)?;
    info!("Wrote {} activities to [{}]", outcome.activities.len(), config.output_path.display());

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Progress and warnings go to stderr so the output artifact path can
    //      be piped around freely.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
