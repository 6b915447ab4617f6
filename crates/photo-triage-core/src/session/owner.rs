//! Single owner of the active session.
//!
//! Loading, scoring and copying run on a rayon pool and post
//! [`WorkerEvent`]s back over a channel. Only [`SessionOwner::apply`]
//! mutates session state, so every score, disposition and counter has one
//! writer. Events carry the [`Generation`] of the selection they were
//! started for; anything older than the latest selection is dropped, except
//! the copies of a realization whose session survived a failed selection.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use super::state::ScoreApplication;
use super::{
    ClassificationSession, Generation, OwnerUpdate, SessionSettings, TriageMode, WorkerEvent,
};
use crate::domain::{
    CopyOutcome, ImageAsset, ImageCollection, RealizationSummary, SharpnessScore, TriageError,
};
use crate::modules::realize;
use crate::ports::{
    FileStore, ImageSource, NullProgress, Phase, ProgressEvent, ProgressSink, SharpnessScorer,
};

/// Adapters the owner dispatches work to.
#[derive(Clone)]
pub struct TriageServices {
    /// Folder enumeration.
    pub source: Arc<dyn ImageSource>,
    /// Per-asset sharpness scoring.
    pub scorer: Arc<dyn SharpnessScorer>,
    /// Folder creation and file copies.
    pub store: Arc<dyn FileStore>,
}

#[derive(Debug, Clone, Copy)]
struct PendingSelection {
    generation: Generation,
    mode: TriageMode,
}

/// Owns the active [`ClassificationSession`] and the worker pool.
pub struct SessionOwner {
    services: TriageServices,
    settings: SessionSettings,
    pool: ThreadPool,
    events_tx: mpsc::Sender<WorkerEvent>,
    events_rx: mpsc::Receiver<WorkerEvent>,
    latest: Generation,
    pending: Option<PendingSelection>,
    session: Option<ClassificationSession>,
    /// Generation the running realization batch was started under. Its
    /// events reach the session that started it even after a failed
    /// selection rebinds that session to a newer generation.
    realization_batch: Option<Generation>,
    progress: Arc<dyn ProgressSink>,
}

impl SessionOwner {
    /// Creates an owner with its worker pool.
    ///
    /// `threads` of `None` lets rayon pick one thread per core.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidCategoryName`] if the category folder
    /// names are unusable, or [`TriageError::WorkerPool`] if the pool cannot
    /// start.
    pub fn new(
        services: TriageServices,
        settings: SessionSettings,
        threads: Option<usize>,
    ) -> Result<Self, TriageError> {
        settings.categories.validate()?;
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("triage-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        let (events_tx, events_rx) = mpsc::channel();

        Ok(Self {
            services,
            settings,
            pool,
            events_tx,
            events_rx,
            latest: Generation::default(),
            pending: None,
            session: None,
            realization_batch: None,
            progress: Arc::new(NullProgress),
        })
    }

    /// Routes progress events to `sink`.
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// The active session, if a folder has loaded.
    #[must_use]
    pub const fn session(&self) -> Option<&ClassificationSession> {
        self.session.as_ref()
    }

    /// Mutable access for operator actions (threshold, tags, navigation).
    pub fn session_mut(&mut self) -> Option<&mut ClassificationSession> {
        self.session.as_mut()
    }

    /// Generation of the most recent selection.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.latest
    }

    /// True while a load, scoring batch or realization is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
            || self
                .session
                .as_ref()
                .is_some_and(ClassificationSession::is_working)
    }

    /// Starts loading `folder`. The returned generation supersedes all
    /// earlier ones at once, so results still in flight for the previous
    /// session are ignored from here on.
    pub fn select_folder(&mut self, folder: impl Into<PathBuf>, mode: TriageMode) -> Generation {
        let folder = folder.into();
        self.latest = self.latest.next();
        let generation = self.latest;
        self.pending = Some(PendingSelection { generation, mode });
        info!("Selecting {} ({mode}, {generation})", folder.display());

        let source = Arc::clone(&self.services.source);
        let tx = self.events_tx.clone();
        self.pool.spawn(move || {
            let result = source.load(&folder);
            let _ = tx.send(WorkerEvent::CollectionLoaded {
                generation,
                mode,
                result,
            });
        });
        generation
    }

    /// Validates readiness and starts copying files into category folders.
    ///
    /// Returns the number of copies the batch will attempt.
    ///
    /// # Errors
    ///
    /// [`TriageError::NoSession`] before a folder has loaded, or whatever
    /// [`ClassificationSession::realization_plan`] reports.
    pub fn start_realization(&mut self) -> Result<usize, TriageError> {
        let session = self.session.as_mut().ok_or(TriageError::NoSession)?;
        let plan = session.realization_plan()?;
        let total = plan.len();
        let generation = session.generation();
        session.begin_realization(total);
        self.realization_batch = Some(generation);

        if !plan.excluded.is_empty() {
            info!("{} image(s) without a disposition are not copied", plan.excluded.len());
        }
        self.progress.on_event(ProgressEvent::Started {
            phase: Phase::Realizing,
            total,
        });

        let store = Arc::clone(&self.services.store);
        let tx = self.events_tx.clone();
        self.pool.spawn(move || {
            let summary = realize(&plan, store.as_ref(), |outcome| {
                let _ = tx.send(WorkerEvent::Copied {
                    generation,
                    outcome: outcome.clone(),
                });
            });
            let _ = tx.send(WorkerEvent::Realized {
                generation,
                summary,
            });
        });
        Ok(total)
    }

    /// Blocks for the next worker event and applies it.
    ///
    /// Returns `None` only if every sender is gone, which cannot happen
    /// while the owner is alive.
    pub fn recv(&mut self) -> Option<OwnerUpdate> {
        let event = self.events_rx.recv().ok()?;
        Some(self.apply(event))
    }

    /// Applies the next worker event if one is waiting.
    pub fn try_recv(&mut self) -> Option<OwnerUpdate> {
        let event = self.events_rx.try_recv().ok()?;
        Some(self.apply(event))
    }

    /// Applies events until nothing is outstanding, returning every update.
    pub fn wait_idle(&mut self) -> Vec<OwnerUpdate> {
        let mut updates = Vec::new();
        while self.is_busy() {
            match self.recv() {
                Some(update) => updates.push(update),
                None => break,
            }
        }
        updates
    }

    /// Applies one worker event to the owned state.
    pub fn apply(&mut self, event: WorkerEvent) -> OwnerUpdate {
        let generation = event.generation();
        let event = match event {
            WorkerEvent::Copied {
                generation,
                outcome,
            } if self.realization_batch == Some(generation) => {
                return self.apply_copy(generation, outcome);
            }
            WorkerEvent::Realized {
                generation,
                summary,
            } if self.realization_batch == Some(generation) => {
                return self.apply_realized(generation, summary);
            }
            other => other,
        };
        if generation != self.latest {
            debug!("Dropping stale event from {generation} (latest {})", self.latest);
            return OwnerUpdate::Discarded { generation };
        }

        match event {
            WorkerEvent::CollectionLoaded {
                generation,
                mode,
                result,
            } => self.apply_loaded(generation, mode, result),
            WorkerEvent::Scored { generation, score } => self.apply_score(generation, score),
            // Copies outside the running batch belong to a replaced session.
            WorkerEvent::Copied { generation, .. } | WorkerEvent::Realized { generation, .. } => {
                OwnerUpdate::Discarded { generation }
            }
        }
    }

    fn apply_realized(
        &mut self,
        generation: Generation,
        summary: RealizationSummary,
    ) -> OwnerUpdate {
        self.realization_batch = None;
        let Some(session) = self.session.as_mut() else {
            return OwnerUpdate::Discarded { generation };
        };
        session.finish_realization();
        self.progress.on_event(ProgressEvent::Finished {
            phase: Phase::Realizing,
            completed: summary.copied(),
            failed: summary.failures.len(),
        });
        info!(
            "Realization finished: {} copied, {} failed",
            summary.copied(),
            summary.failures.len()
        );
        OwnerUpdate::Realized { summary }
    }

    fn current_session(&mut self, generation: Generation) -> Option<&mut ClassificationSession> {
        self.session
            .as_mut()
            .filter(|session| session.generation() == generation)
    }

    fn apply_loaded(
        &mut self,
        generation: Generation,
        mode: TriageMode,
        result: Result<ImageCollection, TriageError>,
    ) -> OwnerUpdate {
        if self.pending.map(|p| p.generation) != Some(generation) {
            return OwnerUpdate::Discarded { generation };
        }
        self.pending = None;

        match result {
            Ok(collection) => {
                if let Some(batch) = self.realization_batch.take() {
                    debug!("Abandoning realization from {batch}");
                }
                let total = collection.len();
                info!(
                    "Loaded {total} image(s) from {} ({mode})",
                    collection.root().display()
                );
                let session =
                    ClassificationSession::new(collection, generation, mode, &self.settings);
                let assets = match mode {
                    TriageMode::Automatic => session.awaiting_score(),
                    TriageMode::Manual => Vec::new(),
                };
                self.session = Some(session);
                if mode == TriageMode::Automatic {
                    self.progress.on_event(ProgressEvent::Started {
                        phase: Phase::Scoring,
                        total,
                    });
                    self.dispatch_scoring(generation, assets);
                }
                OwnerUpdate::SessionReady {
                    generation,
                    mode,
                    total,
                }
            }
            Err(error) => {
                info!("Selection {generation} failed: {error}");
                // Keep the previous session usable under the new generation.
                // Its scoring results were dropped, so score what is missing;
                // a running realization keeps reporting until it finishes.
                if let Some(session) = self.session.as_mut() {
                    session.rebind(generation);
                    let missing = session.awaiting_score();
                    if !missing.is_empty() {
                        debug!("Re-dispatching {} unscored asset(s)", missing.len());
                        self.dispatch_scoring(generation, missing);
                    }
                }
                OwnerUpdate::SelectionFailed { generation, error }
            }
        }
    }

    fn apply_score(&mut self, generation: Generation, score: SharpnessScore) -> OwnerUpdate {
        let progress_sink = Arc::clone(&self.progress);
        let Some(session) = self.current_session(generation) else {
            return OwnerUpdate::Discarded { generation };
        };
        if session.apply_score(score.clone()) == ScoreApplication::Rejected {
            debug!("Ignoring duplicate score for {}", score.asset);
            return OwnerUpdate::Discarded { generation };
        }

        let progress = session.scoring_progress();
        let path = session
            .collection()
            .get(score.asset)
            .map(|a| a.path.display().to_string())
            .unwrap_or_default();
        if score.is_scored() {
            progress_sink.on_event(ProgressEvent::Advanced {
                phase: Phase::Scoring,
                completed: progress.completed,
                total: progress.total,
                path,
            });
        } else {
            progress_sink.on_event(ProgressEvent::Skipped {
                phase: Phase::Scoring,
                path,
                reason: score.failure.clone().unwrap_or_default(),
            });
        }
        if progress.is_done() {
            let failed = session.unscored().len();
            progress_sink.on_event(ProgressEvent::Finished {
                phase: Phase::Scoring,
                completed: progress.total - failed,
                failed,
            });
            info!(
                "Scoring finished: {} blurry of {}",
                session.blurry_count(),
                progress.total
            );
        }
        OwnerUpdate::ScoreApplied { score, progress }
    }

    fn apply_copy(&mut self, generation: Generation, outcome: CopyOutcome) -> OwnerUpdate {
        let progress_sink = Arc::clone(&self.progress);
        let Some(session) = self.session.as_mut() else {
            return OwnerUpdate::Discarded { generation };
        };
        let progress = session.apply_copy();
        let path = outcome.asset().path.display().to_string();
        match &outcome {
            CopyOutcome::Copied { .. } => progress_sink.on_event(ProgressEvent::Advanced {
                phase: Phase::Realizing,
                completed: progress.completed,
                total: progress.total,
                path,
            }),
            CopyOutcome::Failed(failure) => progress_sink.on_event(ProgressEvent::Skipped {
                phase: Phase::Realizing,
                path,
                reason: failure.reason.clone(),
            }),
        }
        OwnerUpdate::Copied { outcome, progress }
    }

    fn dispatch_scoring(&self, generation: Generation, assets: Vec<ImageAsset>) {
        for asset in assets {
            let scorer = Arc::clone(&self.services.scorer);
            let tx = self.events_tx.clone();
            self.pool.spawn(move || {
                let score = scorer.score(&asset);
                let _ = tx.send(WorkerEvent::Scored { generation, score });
            });
        }
    }
}

impl std::fmt::Debug for SessionOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOwner")
            .field("latest", &self.latest)
            .field("pending", &self.pending)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
