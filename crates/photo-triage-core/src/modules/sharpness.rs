//! Sharpness scoring.
//!
//! The score is the population variance of the discrete Laplacian of the
//! grayscale image. Sharp images have strong high-frequency edge content and
//! score high; blurry or flat, low-detail images score low.
//!
//! The kernel is the 4-neighbour Laplacian
//!
//! ```text
//! [ 0  1  0 ]
//! [ 1 -4  1 ]
//! [ 0  1  0 ]
//! ```
//!
//! evaluated at every pixel with reflect-101 borders (`dcb|abcd|cba`). For
//! the same 8-bit gray input this equals OpenCV's
//! `Laplacian(img, CV_64F).var()`; how color becomes gray is up to the
//! decoder.

use image::GrayImage;
use tracing::{debug, warn};

use crate::domain::{ImageAsset, SharpnessScore};
use crate::ports::{ImageDecoder, SharpnessScorer};

/// Scores assets by decoding them and taking the Laplacian variance.
pub struct LaplacianScorer<D> {
    decoder: D,
}

impl<D: ImageDecoder> LaplacianScorer<D> {
    /// Creates a scorer that decodes with `decoder`.
    #[must_use]
    pub const fn new(decoder: D) -> Self {
        Self { decoder }
    }
}

impl<D: ImageDecoder> SharpnessScorer for LaplacianScorer<D> {
    fn score(&self, asset: &ImageAsset) -> SharpnessScore {
        match self.decoder.decode(&asset.path) {
            Ok(gray) => {
                let value = laplacian_variance(&gray);
                debug!("{}: sharpness {value:.2}", asset.path.display());
                SharpnessScore::scored(asset.id(), value)
            }
            Err(e) => {
                warn!("{e}");
                SharpnessScore::decode_failed(asset.id(), e.to_string())
            }
        }
    }
}

/// Population variance of the Laplacian of `image`.
///
/// Returns `0.0` for an empty image. The sums are accumulated as integers,
/// so the result depends only on the pixel values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn laplacian_variance(image: &GrayImage) -> f64 {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return 0.0;
    }

    let pixels = image.as_raw();
    let at = |x: usize, y: usize| i64::from(pixels[y * w + x]);

    let mut sum: i128 = 0;
    let mut sum_sq: i128 = 0;
    for y in 0..h {
        let (up, down) = (reflect_prev(y, h), reflect_next(y, h));
        for x in 0..w {
            let (left, right) = (reflect_prev(x, w), reflect_next(x, w));
            let lap = at(x, up) + at(x, down) + at(left, y) + at(right, y) - 4 * at(x, y);
            sum += i128::from(lap);
            sum_sq += i128::from(lap * lap);
        }
    }

    // var = (n * Σx² - (Σx)²) / n²
    let n = (w * h) as i128;
    let numerator = n * sum_sq - sum * sum;
    numerator as f64 / (n * n) as f64
}

/// Index before `i` with reflect-101 at the low edge.
const fn reflect_prev(i: usize, len: usize) -> usize {
    if i > 0 {
        i - 1
    } else if len > 1 {
        1
    } else {
        0
    }
}

/// Index after `i` with reflect-101 at the high edge.
const fn reflect_next(i: usize, len: usize) -> usize {
    if i + 1 < len {
        i + 1
    } else if len > 1 {
        len - 2
    } else {
        0
    }
}
