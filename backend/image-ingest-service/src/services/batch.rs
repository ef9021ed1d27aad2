//! Batch orchestrator - drives the ingest pipeline over an ordered URL list
//!
//! Each URL runs fetch -> inspect/thumbnail -> encode in its own task. At most
//! `concurrency` tasks are in flight; results land in a slot indexed by input
//! position, so the batch order always equals the input order.

use super::encoder;
use super::fetcher::ImageFetcher;
use super::thumbnail::ThumbnailProcessor;
use crate::error::IngestError;
use crate::models::{Batch, ResultEntry};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Runs one batch through a bounded worker pool
pub struct BatchOrchestrator {
    fetcher: Arc<dyn ImageFetcher>,
    processor: Arc<ThumbnailProcessor>,
    concurrency: usize,
}

impl BatchOrchestrator {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        processor: Arc<ThumbnailProcessor>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            processor,
            concurrency: concurrency.max(1),
        }
    }

    /// Process every URL exactly once and return results in input order
    pub async fn run(&self, urls: Vec<String>) -> Batch {
        let started = Instant::now();
        let total = urls.len();
        info!(total, concurrency = self.concurrency, "Processing batch");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut slots: Vec<Option<ResultEntry>> = (0..total).map(|_| None).collect();
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            // Waiting here keeps at most `concurrency` tasks alive at once.
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(index, url = %url, error = %e, "Worker pool closed");
                    slots[index] = Some(encoder::encode_error(
                        url,
                        &IngestError::Internal(e.to_string()),
                    ));
                    continue;
                }
            };

            let fetcher = self.fetcher.clone();
            let processor = self.processor.clone();
            let url = url.clone();
            tasks.spawn(async move {
                let entry = process_url(fetcher.as_ref(), processor, &url).await;
                drop(permit);
                (index, entry)
            });

            // Collect whatever already finished so results do not pile up.
            while let Some(joined) = tasks.try_join_next() {
                store(&mut slots, joined, total);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            store(&mut slots, joined, total);
        }

        let entries: Vec<ResultEntry> = slots
            .into_iter()
            .zip(urls.iter())
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    encoder::encode_error(
                        url,
                        &IngestError::Internal("worker exited without a result".to_string()),
                    )
                })
            })
            .collect();

        let batch = Batch::new(entries);
        let stats = batch.stats();
        info!(
            total = stats.total,
            succeeded = stats.succeeded,
            failed = stats.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch processing completed"
        );
        batch
    }
}

/// Run one URL through the pipeline; failures become failure entries
pub async fn process_url(
    fetcher: &dyn ImageFetcher,
    processor: Arc<ThumbnailProcessor>,
    url: &str,
) -> ResultEntry {
    match try_process_url(fetcher, processor, url).await {
        Ok(entry) => {
            debug!(url = %url, "Image processed");
            entry
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to process image");
            encoder::encode_error(url, &e)
        }
    }
}

async fn try_process_url(
    fetcher: &dyn ImageFetcher,
    processor: Arc<ThumbnailProcessor>,
    url: &str,
) -> Result<ResultEntry, IngestError> {
    let payload = fetcher.fetch(url).await?;
    let inspected = processor.inspect_async(payload.bytes().clone()).await?;
    Ok(encoder::encode(
        url,
        &payload,
        &inspected.image,
        &inspected.thumbnail,
    ))
}

fn store(
    slots: &mut [Option<ResultEntry>],
    joined: Result<(usize, ResultEntry), tokio::task::JoinError>,
    total: usize,
) {
    match joined {
        Ok((index, entry)) => {
            info!(
                item = index + 1,
                total,
                url = %entry.image_url(),
                success = entry.is_success(),
                "Item finished"
            );
            slots[index] = Some(entry);
        }
        // The slot stays empty and is filled with a failure afterwards.
        Err(e) => error!(error = %e, "Worker task failed"),
    }
}
