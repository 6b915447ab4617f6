//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod confirmation;
mod decoder;
mod file_store;
mod image_source;
mod progress;
mod scorer;

pub use confirmation::{AlwaysConfirm, Confirmation};
pub use decoder::ImageDecoder;
pub use file_store::FileStore;
pub use image_source::ImageSource;
pub use progress::{NullProgress, Phase, ProgressEvent, ProgressSink};
pub use scorer::SharpnessScorer;
