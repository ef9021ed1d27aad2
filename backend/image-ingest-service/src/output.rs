//! Artifact writer
//!
//! The batch is serialized in memory first and lands on disk through a
//! same-directory temp file plus rename, so readers only ever see a complete
//! artifact.

use crate::error::{AppError, Result};
use crate::models::Batch;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// `output_<unix-seconds>.json` in the working directory
pub fn default_output_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("output_{}.json", now.timestamp()))
}

/// Write the whole batch as a pretty-printed JSON array
pub fn write_batch(path: &Path, batch: &Batch) -> Result<()> {
    let json = serde_json::to_vec_pretty(batch)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::io(dir, e))?;
    tmp.write_all(&json).map_err(|e| AppError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| AppError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| AppError::io(path, e.error))?;

    info!(path = %path.display(), records = batch.len(), bytes = json.len(), "Wrote batch artifact");
    Ok(())
}
