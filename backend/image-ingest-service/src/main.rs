//! Image Ingest - bulk-process images from a single URL or a CSV file
//!
//! Environment variables:
//! - INGEST_FETCH_TIMEOUT_SECS: per-URL fetch budget (default: 15)
//! - INGEST_CONCURRENCY: worker pool size (default: available parallelism)
//! - INGEST_USER_AGENT: HTTP user agent (default: "image-ingest/<version>")
//! - THUMB_JPEG_QUALITY: JPEG quality 1-100 for JPEG thumbnails (default: 75)
//! - RUST_LOG: log filter (logs go to stderr)

use anyhow::Context;
use clap::Parser;
use image_ingest_service::services::{BatchOrchestrator, HttpFetcher, ThumbnailProcessor};
use image_ingest_service::{output, sources, IngestConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "image-ingest",
    version,
    about = "Bulk-process images from a single URL or a CSV file"
)]
struct Cli {
    /// One image URL
    #[arg(long)]
    url: Option<String>,

    /// CSV with image-URL rows (first column)
    #[arg(long, alias = "file")]
    csv: Option<PathBuf>,

    /// Output JSON path (defaults to output_<ts>.json)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Per-URL fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Number of URLs processed concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Drop repeated URLs, keeping the first occurrence
    #[arg(long)]
    dedupe: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("image_ingest=info".parse()?)
                .add_directive("image_ingest_service=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = IngestConfig::from_env()?;
    if let Some(secs) = cli.timeout {
        config = config.with_timeout_secs(secs)?;
    }
    if let Some(workers) = cli.concurrency {
        config = config.with_concurrency(workers)?;
    }
    info!(
        timeout_secs = config.fetch.timeout.as_secs(),
        concurrency = config.concurrency,
        "Configuration loaded"
    );

    let mut urls = sources::collect_urls(cli.url.as_deref(), cli.csv.as_deref())?;
    if cli.dedupe {
        let before = urls.len();
        urls = sources::dedupe_in_order(urls);
        info!(before, after = urls.len(), "Removed duplicate URLs");
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
    let processor = Arc::new(ThumbnailProcessor::new(config.thumbnail.clone()));
    let orchestrator = BatchOrchestrator::new(fetcher, processor, config.concurrency);

    let batch = orchestrator.run(urls).await;

    let outfile = cli
        .out
        .unwrap_or_else(|| output::default_output_path(chrono::Utc::now()));
    output::write_batch(&outfile, &batch)
        .with_context(|| format!("failed to write {}", outfile.display()))?;

    println!("Wrote {} ({} records)", outfile.display(), batch.len());
    Ok(())
}
