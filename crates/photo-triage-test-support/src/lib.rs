//! Test support utilities for photo-triage.
//!
//! Provides port mocks, synthetic image builders and temporary photo
//! folders for testing the triage pipeline.
//!
//! # Example
//!
//! ```
//! use photo_triage_test_support::{FixedScorer, MockImageSource, PhotoFolder};
//!
//! // Real files on disk
//! let folder = PhotoFolder::new().with_sharp("a.png").with_blurry("b.png");
//! assert!(folder.join("a.png").is_file());
//!
//! // Or a folder that only exists in memory
//! let source = MockImageSource::new().with_folder("/shoot", &["a.jpg", "b.jpg"]);
//! let scorer = FixedScorer::from_pairs(&[("a.jpg", 40.0), ("b.jpg", 250.0)]);
//! # let _ = (source, scorer);
//! ```

mod builders;
mod mocks;

pub use builders::{PhotoFolder, SyntheticImageBuilder};
pub use mocks::{
    FixedScorer, MockFileStore, MockImageDecoder, MockImageSource, MockProgressSink,
    ScriptedConfirmation,
};
