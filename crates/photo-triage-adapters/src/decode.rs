//! Image decoding with the `image` crate.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use photo_triage_core::domain::TriageError;
use photo_triage_core::ports::ImageDecoder;

/// Decodes png, jpeg and bmp files to 8-bit grayscale.
///
/// Color images are converted with BT.601 luma weights, the conversion
/// OpenCV applies when reading an image as grayscale. Alpha is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, path: &Path) -> Result<GrayImage, TriageError> {
        let image = image::open(path).map_err(|e| TriageError::ImageDecode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(to_gray(image))
    }
}

/// BT.601 luma in 14-bit fixed point (`0.299 R + 0.587 G + 0.114 B`).
fn to_gray(image: DynamicImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    let rgb = match image {
        DynamicImage::ImageLuma8(gray) => return gray,
        other => other.to_rgb8(),
    };
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (R * u32::from(r) + G * u32::from(g) + B * u32::from(b) + (1 << (SHIFT - 1)))
            >> SHIFT;
        Luma([u8::try_from(luma).unwrap_or(u8::MAX)])
    })
}
