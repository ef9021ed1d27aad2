/// Data models for the ingest pipeline
///
/// `ResultEntry` serializes to the artifact's record shape:
/// - success: `image_url, original_size, original_format, original_resolution,
///   original_base64, thumb_size, thumb_resolution, thumb_base64, status`
/// - error: `image_url, status, error`
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Bytes downloaded for one URL.
///
/// Only constructed through [`FetchedPayload::new`], so `size` always matches
/// the buffer length.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    bytes: Bytes,
    size: usize,
}

impl FetchedPayload {
    pub fn new(bytes: Bytes) -> Self {
        let size = bytes.len();
        Self { bytes, size }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Metadata of the decoded original image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Upper-cased format name, e.g. `PNG`, `JPEG`
    pub format: String,
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    pub fn resolution(&self) -> String {
        format_resolution(self.width, self.height)
    }
}

/// Encoded thumbnail, same format as the original
#[derive(Debug, Clone)]
pub struct ThumbnailRecord {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailRecord {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn resolution(&self) -> String {
        format_resolution(self.width, self.height)
    }
}

/// One outcome per input URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResultEntry {
    Success {
        image_url: String,
        original_size: usize,
        original_format: String,
        original_resolution: String,
        original_base64: String,
        thumb_size: usize,
        thumb_resolution: String,
        thumb_base64: String,
    },
    #[serde(rename = "error")]
    Failure { image_url: String, error: String },
}

impl ResultEntry {
    pub fn image_url(&self) -> &str {
        match self {
            ResultEntry::Success { image_url, .. } | ResultEntry::Failure { image_url, .. } => {
                image_url
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEntry::Success { .. })
    }

    /// Error message of a failure entry
    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEntry::Failure { error, .. } => Some(error),
            ResultEntry::Success { .. } => None,
        }
    }
}

/// Ordered results of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    entries: Vec<ResultEntry>,
}

impl Batch {
    pub fn new(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> BatchStats {
        let succeeded = self.entries.iter().filter(|e| e.is_success()).count();
        BatchStats {
            total: self.entries.len(),
            succeeded,
            failed: self.entries.len() - succeeded,
        }
    }
}

/// Statistics about a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub fn format_resolution(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}
