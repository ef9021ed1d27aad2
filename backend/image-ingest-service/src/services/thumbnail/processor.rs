//! Thumbnail processor - inspects fetched images and derives bounded thumbnails
//!
//! Decodes the original, records its format and resolution, shrinks it into the
//! configured bounding box while maintaining aspect ratio, and re-encodes the
//! result in the original format. Images already inside the box are never
//! upscaled.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::error::IngestError;
use crate::models::{ImageRecord, ThumbnailRecord};
use bytes::Bytes;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

type Result<T> = std::result::Result<T, IngestError>;

/// Configuration for thumbnail generation
#[derive(Clone, Debug)]
pub struct ThumbnailConfig {
    /// Maximum thumbnail width in pixels
    pub max_width: u32,
    /// Maximum thumbnail height in pixels
    pub max_height: u32,
    /// JPEG quality (1-100), only used when the original is JPEG
    pub jpeg_quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 320,
            max_height: 568,
            jpeg_quality: 75,
        }
    }
}

/// Original metadata plus the derived thumbnail
#[derive(Debug)]
pub struct InspectedImage {
    pub image: ImageRecord,
    pub thumbnail: ThumbnailRecord,
}

/// Thumbnail processor
pub struct ThumbnailProcessor {
    config: ThumbnailConfig,
}

impl ThumbnailProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ThumbnailConfig::default())
    }

    /// Decode `original_data` and derive its thumbnail (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `inspect_async` instead.
    pub fn inspect_and_thumbnail(&self, original_data: &[u8]) -> Result<InspectedImage> {
        let reader = ImageReader::new(Cursor::new(original_data))
            .with_guessed_format()
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| IngestError::Decode("unrecognized image format".to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| IngestError::Decode(e.to_string()))?;

        let (orig_w, orig_h) = img.dimensions();
        let image = ImageRecord {
            format: format_tag(format),
            width: orig_w,
            height: orig_h,
        };

        let (new_w, new_h) = self.calculate_dimensions(orig_w, orig_h);
        let thumb = if (new_w, new_h) == (orig_w, orig_h) {
            debug!(
                width = orig_w,
                height = orig_h,
                "Image already within bounds, re-encoding as-is"
            );
            img
        } else {
            img.resize_exact(new_w, new_h, FilterType::Lanczos3)
        };

        let data = self.encode(&thumb, format)?;

        debug!(
            format = %image.format,
            original_width = orig_w,
            original_height = orig_h,
            width = new_w,
            height = new_h,
            size = data.len(),
            "Thumbnail generated"
        );

        Ok(InspectedImage {
            image,
            thumbnail: ThumbnailRecord {
                data,
                width: new_w,
                height: new_h,
            },
        })
    }

    /// Inspect and thumbnail on the blocking thread pool
    ///
    /// # Example
    /// ```ignore
    /// let processor = Arc::new(ThumbnailProcessor::with_defaults());
    /// let inspected = processor.inspect_async(payload.bytes().clone()).await?;
    /// ```
    pub async fn inspect_async(self: Arc<Self>, original_data: Bytes) -> Result<InspectedImage> {
        tokio::task::spawn_blocking(move || self.inspect_and_thumbnail(&original_data))
            .await
            .map_err(|e| IngestError::Internal(format!("thumbnail task failed: {e}")))?
    }

    /// Fit `width`x`height` into the bounding box, never scaling up
    pub fn calculate_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (width, height);
        }

        let scale = 1.0_f64
            .min(self.config.max_width as f64 / width as f64)
            .min(self.config.max_height as f64 / height as f64);
        if scale >= 1.0 {
            return (width, height);
        }

        let fit = |dim: u32, bound: u32| ((dim as f64 * scale).round() as u32).clamp(1, bound);
        (
            fit(width, self.config.max_width),
            fit(height, self.config.max_height),
        )
    }

    /// Encode in the original format
    fn encode(&self, img: &DynamicImage, format: ImageFormat) -> Result<Bytes> {
        let output = match format {
            ImageFormat::Jpeg => ImageOutputFormat::Jpeg(self.config.jpeg_quality),
            other => ImageOutputFormat::from(other),
        };

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), output)
            .map_err(|e| IngestError::Encode(e.to_string()))?;

        Ok(Bytes::from(buf))
    }
}

/// Format name as reported in results, e.g. `PNG`, `JPEG`, `WEBP`
pub fn format_tag(format: ImageFormat) -> String {
    format!("{format:?}").to_ascii_uppercase()
}
