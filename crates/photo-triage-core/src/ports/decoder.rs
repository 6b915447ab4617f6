//! Decoder port: file path in, grayscale pixels out.

use std::path::Path;

use image::GrayImage;

use crate::domain::TriageError;

/// Port for decoding an image file to single-channel grayscale.
pub trait ImageDecoder: Send + Sync {
    /// Decodes `path` to 8-bit luma.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ImageDecode`] if the file is unreadable or not
    /// a supported image.
    fn decode(&self, path: &Path) -> Result<GrayImage, TriageError>;
}
