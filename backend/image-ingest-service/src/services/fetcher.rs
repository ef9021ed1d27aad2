//! Resource-bounded HTTP fetcher
//!
//! Downloads a URL into memory under a fetch budget:
//! - the whole exchange (connect, headers, body) must finish within `timeout`
//! - the body may not exceed `max_bytes`; the download is abandoned as soon as
//!   the next chunk would cross the ceiling

use crate::config::FetchConfig;
use crate::error::{AppError, IngestError, Result};
use crate::models::FetchedPayload;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Source of image bytes for the pipeline
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPayload, IngestError>;
}

/// reqwest-backed fetcher shared by all workers of a run
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_bytes: config.max_bytes,
        })
    }

    async fn download(&self, url: &str) -> std::result::Result<FetchedPayload, IngestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::TransportStatus(status.as_u16()));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes as u64 {
                debug!(url = %url, declared, "Declared length over limit, not reading body");
                return Err(IngestError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| self.classify(e)));
        let body = read_bounded(stream, self.max_bytes).await?;

        debug!(url = %url, size = body.len(), "Downloaded payload");
        Ok(FetchedPayload::new(body))
    }

    fn classify(&self, err: reqwest::Error) -> IngestError {
        if err.is_timeout() {
            IngestError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPayload, IngestError> {
        // Dropping the download future on expiry closes the connection.
        match tokio::time::timeout(self.timeout, self.download(url)).await {
            Ok(result) => result,
            Err(_) => Err(IngestError::Timeout(self.timeout)),
        }
    }
}

/// Collect a chunk stream into memory, refusing to hold more than `max_bytes`.
///
/// The stream is not polled again once a chunk would cross the limit, and that
/// chunk is never copied into the buffer.
pub async fn read_bounded<S>(
    stream: S,
    max_bytes: usize,
) -> std::result::Result<Bytes, IngestError>
where
    S: Stream<Item = std::result::Result<Bytes, IngestError>>,
{
    futures::pin_mut!(stream);

    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > max_bytes {
            return Err(IngestError::PayloadTooLarge { limit: max_bytes });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}
