//! Record encoder - turns pipeline outputs into result entries
//!
//! Sizes are raw byte counts; payloads are standard (padded) base64.

use crate::error::IngestError;
use crate::models::{FetchedPayload, ImageRecord, ResultEntry, ThumbnailRecord};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Build a success entry from a fetched original and its thumbnail
pub fn encode(
    url: &str,
    payload: &FetchedPayload,
    image: &ImageRecord,
    thumb: &ThumbnailRecord,
) -> ResultEntry {
    ResultEntry::Success {
        image_url: url.to_string(),
        original_size: payload.size(),
        original_format: image.format.clone(),
        original_resolution: image.resolution(),
        original_base64: STANDARD.encode(payload.bytes()),
        thumb_size: thumb.size(),
        thumb_resolution: thumb.resolution(),
        thumb_base64: STANDARD.encode(&thumb.data),
    }
}

/// Build a failure entry carrying the error's full message
pub fn encode_error(url: &str, error: &IngestError) -> ResultEntry {
    ResultEntry::Failure {
        image_url: url.to_string(),
        error: error.to_string(),
    }
}
