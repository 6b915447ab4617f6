//! Error taxonomy for triage operations.
//!
//! Folder-level errors abort the single operation that raised them. Per-asset
//! errors (`ImageDecode`, `FileCopy`) are recovered locally by the batch that
//! produced them and surface in its summary instead.

use std::path::PathBuf;

use thiserror::Error;

use super::Disposition;

/// Errors raised by the triage engine and its adapters.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TriageError {
    /// The selected folder is missing or unreadable.
    #[error("cannot read folder {}: {source}", path.display())]
    FolderAccess {
        /// Folder that was selected.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The folder holds no png/jpg/jpeg/bmp files.
    #[error("no images found in {}; pick another folder", path.display())]
    EmptyCollection {
        /// Folder that was selected.
        path: PathBuf,
    },

    /// A single image could not be decoded.
    #[error("cannot decode {}: {reason}", path.display())]
    ImageDecode {
        /// Image that failed.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A single file could not be copied into its category folder.
    #[error("cannot copy {} into {}: {source}", path.display(), destination.display())]
    FileCopy {
        /// Source image.
        path: PathBuf,
        /// Destination folder.
        destination: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Threshold input outside `0..=100`.
    #[error("threshold {value} is not in 0..=100")]
    ThresholdOutOfRange {
        /// Rejected value.
        value: f64,
    },

    /// Threshold is pinned to the default and cannot change.
    #[error("threshold is locked to the default")]
    ThresholdLocked,

    /// Operation belongs to the other classification mode.
    #[error("operation requires {expected} mode")]
    WrongMode {
        /// Mode the operation needs.
        expected: &'static str,
    },

    /// `Unclassified` is not something an operator can assign.
    #[error("cannot tag an image as {disposition}")]
    InvalidTag {
        /// Rejected value.
        disposition: Disposition,
    },

    /// No folder has been loaded yet.
    #[error("no folder selected")]
    NoSession,

    /// Realization requested before every asset was scored.
    #[error("scoring incomplete: {completed}/{total} images scored")]
    ScoringIncomplete {
        /// Results applied so far.
        completed: usize,
        /// Assets in the session.
        total: usize,
    },

    /// Realization requested while some assets are still untagged.
    #[error("{remaining} image(s) still untagged")]
    Untagged {
        /// Number of untagged assets.
        remaining: usize,
    },

    /// A category folder name would escape the root, alias it or collide
    /// with another category.
    #[error("invalid folder name '{name}' for {disposition}: {reason}")]
    InvalidCategoryName {
        /// Category the name was configured for.
        disposition: Disposition,
        /// Rejected name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A realization batch is already running for this session.
    #[error("realization already in progress")]
    RealizationInProgress,

    /// The background worker pool could not be started.
    #[error("cannot start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl TriageError {
    /// Returns true for errors that concern a single asset inside a batch.
    #[must_use]
    pub const fn is_per_asset(&self) -> bool {
        matches!(self, Self::ImageDecode { .. } | Self::FileCopy { .. })
    }
}
