//! Image Ingest Service
//!
//! Bulk remote-image ingestion: fetches image URLs under a size/time budget,
//! records format and resolution, derives bounded thumbnails and writes one
//! JSON artifact per run. A failing URL never aborts the batch.

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod services;
pub mod sources;

// Public re-exports
pub use config::IngestConfig;
pub use error::{AppError, IngestError, Result};
pub use models::{Batch, ResultEntry};
