//! Realization results.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::{Disposition, ImageAsset};

/// A per-asset copy failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFailure {
    /// Asset that failed to copy.
    pub asset: ImageAsset,
    /// Human-readable cause.
    pub reason: String,
}

/// Result of copying a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CopyOutcome {
    /// The asset was copied into its category folder.
    Copied {
        /// Asset that was copied.
        asset: ImageAsset,
        /// Category it was copied into.
        disposition: Disposition,
        /// Path of the copy.
        destination: PathBuf,
    },
    /// The copy failed; the batch continued.
    Failed(CopyFailure),
}

impl CopyOutcome {
    /// Asset this outcome concerns.
    #[must_use]
    pub const fn asset(&self) -> &ImageAsset {
        match self {
            Self::Copied { asset, .. } | Self::Failed(CopyFailure { asset, .. }) => asset,
        }
    }
}

/// Read-only report produced once per realization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RealizationSummary {
    /// Successful copies per category.
    pub per_category: BTreeMap<Disposition, usize>,
    /// Copies that failed.
    pub failures: Vec<CopyFailure>,
    /// Assets left out because they could not be scored.
    pub excluded: Vec<ImageAsset>,
}

impl RealizationSummary {
    /// Folds one copy outcome into the summary.
    pub fn record(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied { disposition, .. } => {
                *self.per_category.entry(disposition).or_insert(0) += 1;
            }
            CopyOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Successful copies for one category.
    #[must_use]
    pub fn count(&self, disposition: Disposition) -> usize {
        self.per_category.get(&disposition).copied().unwrap_or(0)
    }

    /// Total successful copies.
    #[must_use]
    pub fn copied(&self) -> usize {
        self.per_category.values().sum()
    }

    /// True when no copy failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, index: usize) -> ImageAsset {
        ImageAsset {
            path: PathBuf::from(name),
            discovery_index: index,
        }
    }

    #[test]
    fn test_record_counts_and_failures() {
        let mut summary = RealizationSummary::default();
        summary.record(CopyOutcome::Copied {
            asset: asset("a.jpg", 0),
            disposition: Disposition::Keep,
            destination: PathBuf::from("Keep/a.jpg"),
        });
        summary.record(CopyOutcome::Failed(CopyFailure {
            asset: asset("b.jpg", 1),
            reason: "permission denied".into(),
        }));

        assert_eq!(summary.count(Disposition::Keep), 1);
        assert_eq!(summary.count(Disposition::Discard), 0);
        assert_eq!(summary.copied(), 1);
        assert!(!summary.is_clean());
        assert_eq!(summary.failures[0].asset.discovery_index, 1);
    }
}
