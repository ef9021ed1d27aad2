//! Thumbnail generation
//!
//! - Image processor for decoding, resizing and re-encoding

pub mod processor;

pub use processor::{format_tag, InspectedImage, ThumbnailConfig, ThumbnailProcessor};
