//! Core domain types for photo triage.

mod asset;
mod disposition;
mod error;
mod score;
mod summary;

pub use asset::{AssetId, ImageAsset, ImageCollection};
pub use disposition::{is_plain_folder_name, CategoryNames, Disposition, Dispositions};
pub use error::TriageError;
pub use score::{Progress, ScoreStatus, SharpnessScore, Threshold};
pub use summary::{CopyFailure, CopyOutcome, RealizationSummary};
