//! Integration tests for folder enumeration and decoding.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use photo_triage_adapters::{FsImageSource, RasterDecoder};
use photo_triage_core::domain::TriageError;
use photo_triage_core::ports::{ImageDecoder, ImageSource};
use photo_triage_test_support::{PhotoFolder, SyntheticImageBuilder};

fn names(folder: &Path) -> Vec<String> {
    FsImageSource::new()
        .load(folder)
        .expect("should load folder")
        .iter()
        .map(|a| a.file_name().to_string())
        .collect()
}

#[test]
fn test_filters_by_extension_case_insensitively() {
    let folder = PhotoFolder::new()
        .with_sharp("a.png")
        .with_sharp("b.JPG")
        .with_sharp("c.jpeg")
        .with_sharp("d.bmp")
        .with_bytes("e.gif", b"GIF89a")
        .with_bytes("notes.txt", b"not a photo")
        .with_bytes("README", b"");

    assert_eq!(names(folder.path()), vec!["a.png", "b.JPG", "c.jpeg", "d.bmp"]);
}

#[test]
fn test_order_is_by_file_name_and_indices_follow_it() {
    let folder = PhotoFolder::new()
        .with_sharp("IMG_0003.jpg")
        .with_sharp("IMG_0001.jpg")
        .with_sharp("IMG_0002.jpg");

    let collection = FsImageSource::new().load(folder.path()).unwrap();
    let listed: Vec<_> = collection
        .iter()
        .map(|a| (a.discovery_index, a.file_name().to_string()))
        .collect();
    assert_eq!(
        listed,
        vec![
            (0, "IMG_0001.jpg".to_string()),
            (1, "IMG_0002.jpg".to_string()),
            (2, "IMG_0003.jpg".to_string()),
        ]
    );
    assert_eq!(collection.root(), folder.path());
}

#[test]
fn test_subfolders_are_not_descended() {
    let folder = PhotoFolder::new().with_sharp("top.png");
    std::fs::create_dir(folder.join("Keep")).unwrap();
    std::fs::copy(folder.join("top.png"), folder.join("Keep/old.png")).unwrap();
    // A directory named like an image is not an image.
    std::fs::create_dir(folder.join("album.jpg")).unwrap();

    assert_eq!(names(folder.path()), vec!["top.png"]);
}

#[test]
fn test_folder_without_images_is_empty_collection() {
    let folder = PhotoFolder::new().with_bytes("notes.txt", b"nothing here");
    let err = FsImageSource::new().load(folder.path()).unwrap_err();
    assert!(matches!(err, TriageError::EmptyCollection { .. }));
}

#[test]
fn test_missing_folder_is_folder_access() {
    let folder = PhotoFolder::new();
    let err = FsImageSource::new()
        .load(&folder.join("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, TriageError::FolderAccess { .. }));
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_decode_color_and_gray() {
    let folder = PhotoFolder::new()
        .with_image("gray.png", &SyntheticImageBuilder::checkerboard(16, 8))
        .with_image(
            "color.bmp",
            &SyntheticImageBuilder::rgb_uniform(4, 4, 255, 255, 255),
        );
    let decoder = RasterDecoder::new();

    let gray = decoder.decode(&folder.join("gray.png")).unwrap();
    assert_eq!(gray.dimensions(), (16, 8));
    let color = decoder.decode(&folder.join("color.bmp")).unwrap();
    assert!(color.pixels().all(|p| p.0[0] == 255));
}

#[test]
fn test_decode_uses_bt601_weights() {
    let folder = PhotoFolder::new()
        .with_image("red.png", &SyntheticImageBuilder::rgb_uniform(2, 2, 255, 0, 0))
        .with_image("green.png", &SyntheticImageBuilder::rgb_uniform(2, 2, 0, 255, 0))
        .with_image("blue.png", &SyntheticImageBuilder::rgb_uniform(2, 2, 0, 0, 255));
    let decoder = RasterDecoder::new();
    let luma = |name: &str| decoder.decode(&folder.join(name)).unwrap().get_pixel(0, 0).0[0];

    // Rec. 709 weights would give 54, 182 and 18.
    assert_eq!(luma("red.png"), 76);
    assert_eq!(luma("green.png"), 150);
    assert_eq!(luma("blue.png"), 29);
}

#[test]
fn test_decode_corrupt_file_is_image_decode() {
    let folder = PhotoFolder::new().with_bytes("broken.jpg", b"\xFF\xD8\xFF not really");
    let err = RasterDecoder::new()
        .decode(&folder.join("broken.jpg"))
        .unwrap_err();
    assert!(err.is_per_asset());
    assert!(matches!(err, TriageError::ImageDecode { .. }));
}
