/// Error types for the image ingest service
///
/// Two layers of errors exist:
/// - [`IngestError`]: per-URL failures. Always recoverable; they become the
///   `error` string of a failure entry and never stop the batch.
/// - [`AppError`]: invocation-level failures. Fatal; no artifact is written.
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for invocation-level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a single URL's fetch/decode/thumbnail/encode chain
#[derive(Debug, Error)]
pub enum IngestError {
    /// Server answered with a non-success status
    #[error("transport error: {0}")]
    TransportStatus(u16),

    /// Connection, TLS, redirect or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Fetch exceeded its time budget
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Body grew past the byte ceiling
    #[error("payload exceeds {} limit", human_size(.limit))]
    PayloadTooLarge { limit: usize },

    /// Bytes are not a recognized or valid raster image
    #[error("unsupported or corrupt image: {0}")]
    Decode(String),

    /// Thumbnail could not be written back in the source format
    #[error("thumbnail encode failed: {0}")]
    Encode(String),

    /// Worker task panicked or was cancelled
    #[error("processing task failed: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return IngestError::TransportStatus(status.as_u16());
        }
        IngestError::Transport(describe_chain(&err))
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Neither a URL nor an input file was supplied
    #[error("Provide --url or --csv")]
    NoInputProvided,

    /// Inputs were supplied but yielded no candidate URL
    #[error("No valid URLs supplied.")]
    EmptyUrlList,

    /// Input file or output artifact I/O failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Batch could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

fn human_size(bytes: &usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    match *bytes {
        b if b >= MIB && b % MIB == 0 => format!("{} MiB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{} KiB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Flatten an error and its sources into one line.
///
/// reqwest hides the useful part ("connection refused", "dns error") in the
/// source chain, so the top-level message alone is not descriptive enough.
fn describe_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
