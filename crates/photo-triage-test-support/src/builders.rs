//! Synthetic image builders and on-disk photo folders for testing.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageResult, Luma, RgbImage};
use tempfile::TempDir;

/// Builder for creating synthetic test images.
///
/// Sharp patterns score far above the default threshold of 100; flat and
/// gradient images score near zero.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> DynamicImage {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates vertical bars pattern (sharp edges).
    #[must_use]
    pub fn vertical_bars(width: u32, height: u32, bar_width: u32) -> DynamicImage {
        let bar = bar_width.max(1);
        let img = GrayImage::from_fn(width, height, |x, _| {
            if (x / bar) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    // === Blurry Images ===

    /// Creates a uniform gray image (no edges, simulates severe blur).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    /// Creates a smooth horizontal gradient (low variance, simulates defocus).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates an RGB color image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |_, _| image::Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    /// Returns a standard sharp test image (64x64 checkerboard).
    #[must_use]
    pub fn sharp_image() -> DynamicImage {
        Self::checkerboard(64, 64)
    }

    /// Returns a standard blurry test image (64x64 uniform gray).
    #[must_use]
    pub fn blurry_image() -> DynamicImage {
        Self::uniform_gray(64, 64, 128)
    }
}

/// A temporary folder of photos, removed on drop.
///
/// Images are encoded according to their file extension.
pub struct PhotoFolder {
    dir: TempDir,
}

impl PhotoFolder {
    /// Creates an empty folder.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Folder path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the folder.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Saves `image` as `name`, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns the encoder error.
    pub fn try_image(&self, name: &str, image: &DynamicImage) -> ImageResult<PathBuf> {
        let path = self.join(name);
        image.save(&path)?;
        Ok(path)
    }

    /// Saves `image` as `name`.
    ///
    /// # Panics
    ///
    /// Panics if the image cannot be encoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_image(self, name: &str, image: &DynamicImage) -> Self {
        self.try_image(name, image).expect("write test image");
        self
    }

    /// Adds a sharp checkerboard as `name`.
    #[must_use]
    pub fn with_sharp(self, name: &str) -> Self {
        self.with_image(name, &SyntheticImageBuilder::sharp_image())
    }

    /// Adds a flat gray image as `name`.
    #[must_use]
    pub fn with_blurry(self, name: &str) -> Self {
        self.with_image(name, &SyntheticImageBuilder::blurry_image())
    }

    /// Writes raw bytes as `name`, for non-image or corrupt files.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_bytes(self, name: &str, bytes: &[u8]) -> Self {
        std::fs::write(self.join(name), bytes).expect("write test file");
        self
    }
}

impl Default for PhotoFolder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_pattern() {
        let img = SyntheticImageBuilder::checkerboard_with_cell_size(16, 16, 8);
        let luma = img.to_luma8();

        assert_eq!(luma.get_pixel(0, 0).0[0], 255);
        assert_eq!(luma.get_pixel(8, 0).0[0], 0);
    }

    #[test]
    fn test_uniform_gray() {
        let img = SyntheticImageBuilder::uniform_gray(50, 50, 100);
        assert!(img.to_luma8().pixels().all(|p| p.0[0] == 100));
    }

    #[test]
    fn test_gradient_range() {
        let luma = SyntheticImageBuilder::horizontal_gradient(256, 10).to_luma8();
        assert!(luma.get_pixel(0, 0).0[0] < 5);
        assert!(luma.get_pixel(255, 0).0[0] > 250);
    }

    #[test]
    fn test_folder_writes_by_extension() {
        let folder = PhotoFolder::new()
            .with_sharp("a.png")
            .with_blurry("b.jpg")
            .with_bytes("notes.txt", b"hello");

        assert!(folder.join("a.png").is_file());
        assert!(folder.join("b.jpg").is_file());
        assert!(image::open(folder.join("a.png")).is_ok());
        assert!(image::open(folder.join("b.jpg")).is_ok());
        assert!(folder.join("notes.txt").is_file());
    }
}
