//! Photo Triage Adapters - External adapters for photo-triage.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Raster image decoding
//! - Copying files into category folders

pub mod decode;
pub mod fs;

use std::sync::Arc;

use photo_triage_core::modules::LaplacianScorer;
use photo_triage_core::session::TriageServices;

pub use decode::RasterDecoder;
pub use fs::{FsFileStore, FsImageSource};

/// Services backed by the local filesystem and the Laplacian scorer.
#[must_use]
pub fn filesystem_services() -> TriageServices {
    TriageServices {
        source: Arc::new(FsImageSource::new()),
        scorer: Arc::new(LaplacianScorer::new(RasterDecoder::new())),
        store: Arc::new(FsFileStore::new()),
    }
}
