//! Progress reporting port for UI integration.

/// Which batch a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Computing sharpness scores.
    Scoring,
    /// Copying files into category folders.
    Realizing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scoring => f.write_str("scoring"),
            Self::Realizing => f.write_str("copying"),
        }
    }
}

/// Events emitted by the session owner as results are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A batch started.
    Started {
        /// Batch kind.
        phase: Phase,
        /// Items in the batch.
        total: usize,
    },
    /// One result was applied.
    Advanced {
        /// Batch kind.
        phase: Phase,
        /// Results applied so far.
        completed: usize,
        /// Items in the batch.
        total: usize,
        /// Path of the item just applied.
        path: String,
    },
    /// One item failed; it still counts toward `completed`.
    Skipped {
        /// Batch kind.
        phase: Phase,
        /// Path to the item.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// The batch is done.
    Finished {
        /// Batch kind.
        phase: Phase,
        /// Items that succeeded.
        completed: usize,
        /// Items that failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
