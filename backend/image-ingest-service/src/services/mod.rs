/// Service layer for the ingest pipeline
///
/// - Fetcher: bounded downloads
/// - Thumbnail: decode, inspect, resize, re-encode
/// - Encoder: result entries
/// - Batch: bounded worker pool over a URL list
pub mod batch;
pub mod encoder;
pub mod fetcher;
pub mod thumbnail;

pub use batch::BatchOrchestrator;
pub use fetcher::{HttpFetcher, ImageFetcher};
pub use thumbnail::{ThumbnailConfig, ThumbnailProcessor};
