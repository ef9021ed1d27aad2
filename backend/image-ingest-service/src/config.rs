/// Configuration management for the image ingest service
///
/// Loads configuration from environment variables with sensible defaults.
/// Command-line flags are applied on top by the binary.
use crate::error::{AppError, Result};
use crate::services::thumbnail::ThumbnailConfig;
use std::str::FromStr;
use std::time::Duration;

/// Hard ceiling on a single downloaded payload (10 MiB)
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default per-URL fetch budget
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub fetch: FetchConfig,
    pub thumbnail: ThumbnailConfig,
    /// Maximum number of URLs processed at once
    pub concurrency: usize,
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_bytes: MAX_PAYLOAD_BYTES,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            thumbnail: ThumbnailConfig::default(),
            concurrency: default_concurrency(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = parse_env::<u64>("INGEST_FETCH_TIMEOUT_SECS")? {
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(workers) = parse_env::<usize>("INGEST_CONCURRENCY")? {
            config = config.with_concurrency(workers)?;
        }
        if let Ok(agent) = std::env::var("INGEST_USER_AGENT") {
            if !agent.trim().is_empty() {
                config.fetch.user_agent = agent;
            }
        }
        if let Some(quality) = parse_env::<u8>("THUMB_JPEG_QUALITY")? {
            if quality == 0 || quality > 100 {
                return Err(AppError::Config(format!(
                    "THUMB_JPEG_QUALITY must be within 1-100, got {quality}"
                )));
            }
            config.thumbnail.jpeg_quality = quality;
        }

        Ok(config)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(AppError::Config(
                "fetch timeout must be at least 1 second".to_string(),
            ));
        }
        self.fetch.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn with_concurrency(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(AppError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        self.concurrency = workers;
        Ok(self)
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_user_agent() -> String {
    format!("image-ingest/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("invalid {key}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}
