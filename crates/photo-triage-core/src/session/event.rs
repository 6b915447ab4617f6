//! Messages between background workers and the session owner.

use std::fmt;

use serde::Serialize;

use super::TriageMode;
use crate::domain::{
    CopyOutcome, ImageCollection, Progress, RealizationSummary, SharpnessScore, TriageError,
};

/// Folder-selection counter. Every selection gets a new one and results
/// tagged with an older one are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Result posted by a background task.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A folder finished loading.
    CollectionLoaded {
        /// Selection the load belongs to.
        generation: Generation,
        /// Mode requested with the selection.
        mode: TriageMode,
        /// The collection, or why it could not be built.
        result: Result<ImageCollection, TriageError>,
    },
    /// One asset was scored.
    Scored {
        /// Session the score belongs to.
        generation: Generation,
        /// The score.
        score: SharpnessScore,
    },
    /// One file copy finished.
    Copied {
        /// Session the copy belongs to.
        generation: Generation,
        /// Success or failure of the copy.
        outcome: CopyOutcome,
    },
    /// A realization batch finished.
    Realized {
        /// Session the batch belongs to.
        generation: Generation,
        /// Per-category counts and failures.
        summary: RealizationSummary,
    },
}

impl WorkerEvent {
    /// Generation the event is tagged with.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::CollectionLoaded { generation, .. }
            | Self::Scored { generation, .. }
            | Self::Copied { generation, .. }
            | Self::Realized { generation, .. } => *generation,
        }
    }
}

/// What applying one worker event changed.
#[derive(Debug)]
pub enum OwnerUpdate {
    /// A new session replaced the previous one.
    SessionReady {
        /// Generation of the new session.
        generation: Generation,
        /// Mode of the new session.
        mode: TriageMode,
        /// Number of assets.
        total: usize,
    },
    /// A selection failed; any previous session is kept.
    SelectionFailed {
        /// Generation of the failed selection.
        generation: Generation,
        /// Why loading failed.
        error: TriageError,
    },
    /// A score was stored.
    ScoreApplied {
        /// The score.
        score: SharpnessScore,
        /// Scoring progress after applying it.
        progress: Progress,
    },
    /// A copy result was recorded.
    Copied {
        /// Result of the copy.
        outcome: CopyOutcome,
        /// Realization progress after recording it.
        progress: Progress,
    },
    /// A realization batch finished.
    Realized {
        /// Per-category counts and failures.
        summary: RealizationSummary,
    },
    /// The event was stale or a duplicate and changed nothing.
    Discarded {
        /// Generation the event carried.
        generation: Generation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_ordering() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "g1");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_generation_serializes_as_number() {
        let generation = Generation::default().next().next();
        assert_eq!(serde_json::to_string(&generation).unwrap(), "2");
    }
}
