//! Photo Triage Core - Domain logic, sorting modules and the session owner
//!
//! This crate contains the domain types, the ports adapters plug into, the
//! sharpness scorer, threshold classifier, manual tagger and realizer, and
//! the session owner that runs them on background workers.

pub mod domain;
pub mod modules;
pub mod ports;
pub mod session;

pub use domain::{
    AssetId, CategoryNames, Disposition, ImageAsset, ImageCollection, RealizationSummary,
    SharpnessScore, Threshold, TriageError,
};
pub use ports::{ImageSource, ProgressEvent, ProgressSink};
pub use session::{ClassificationSession, SessionOwner, SessionSettings, TriageMode};
