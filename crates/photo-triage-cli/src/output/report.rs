//! Report model shared by the output formats.

use std::collections::BTreeMap;
use std::path::PathBuf;

use photo_triage_core::domain::{Disposition, RealizationSummary};
use photo_triage_core::session::{ClassificationSession, TriageMode};
use serde::Serialize;
use tracing::debug;

/// One image in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ImageEntry {
    /// Image file.
    pub path: PathBuf,
    /// Sharpness score, when the image was scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Final disposition.
    pub disposition: Disposition,
    /// Why the image could not be scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A file that could not be copied.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    /// Image file.
    pub path: PathBuf,
    /// Cause of the failure.
    pub reason: String,
}

/// What the copy step did.
#[derive(Debug, Clone, Serialize)]
pub struct CopyReport {
    /// Files copied per category folder name.
    pub folders: BTreeMap<String, usize>,
    /// Copies that failed.
    pub failures: Vec<FailureEntry>,
    /// Images left out because they have no disposition.
    pub excluded: Vec<PathBuf>,
}

/// Outcome of one triage run.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    /// Folder that was sorted.
    pub folder: PathBuf,
    /// Classification mode.
    pub mode: TriageMode,
    /// RFC 3339 time the report was produced.
    pub timestamp: String,
    /// Threshold in automatic mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Whether the threshold was pinned to the default.
    pub threshold_locked: bool,
    /// True when nothing was copied on purpose.
    pub dry_run: bool,
    /// Number of images in the folder.
    pub total: usize,
    /// Images classified as blurry.
    pub blurry: usize,
    /// Every image, in collection order.
    pub images: Vec<ImageEntry>,
    /// Copy results, absent on a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied: Option<CopyReport>,
}

impl TriageReport {
    /// Builds a report from the session and, if files were copied, the
    /// realization summary.
    pub fn new(
        session: &ClassificationSession,
        summary: Option<&RealizationSummary>,
        dry_run: bool,
    ) -> Self {
        let images = session
            .assets()
            .iter()
            .map(|asset| {
                let score = session.score(asset.id());
                ImageEntry {
                    path: asset.path.clone(),
                    score: score.filter(|s| s.is_scored()).map(|s| s.value),
                    disposition: session.disposition(asset.id()),
                    error: score.and_then(|s| s.failure.clone()),
                }
            })
            .collect();

        let copied = summary.map(|summary| {
            let categories = session.categories();
            let folders = summary
                .per_category
                .iter()
                .filter_map(|(disposition, count)| {
                    categories
                        .folder_for(*disposition)
                        .map(|name| (name.to_string(), *count))
                })
                .collect();
            CopyReport {
                folders,
                failures: summary
                    .failures
                    .iter()
                    .map(|f| FailureEntry {
                        path: f.asset.path.clone(),
                        reason: f.reason.clone(),
                    })
                    .collect(),
                excluded: summary.excluded.iter().map(|a| a.path.clone()).collect(),
            }
        });

        Self {
            folder: session.root().to_path_buf(),
            mode: session.mode(),
            timestamp: iso_timestamp(),
            threshold: session.threshold().map(|t| t.value()),
            threshold_locked: session.is_threshold_locked(),
            dry_run,
            total: session.assets().len(),
            blurry: session.blurry_count(),
            images,
            copied,
        }
    }

    /// Images that could not be scored plus copies that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        let unscored = self.images.iter().filter(|i| i.error.is_some()).count();
        let failed_copies = self.copied.as_ref().map_or(0, |c| c.failures.len());
        unscored + failed_copies
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
