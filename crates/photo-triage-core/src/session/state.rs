//! The per-folder classification session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Generation;
use crate::domain::{
    AssetId, CategoryNames, Disposition, Dispositions, ImageAsset, ImageCollection, Progress,
    SharpnessScore, Threshold, TriageError,
};
use crate::modules::{ManualTagger, RealizationPlan, TagOutcome, ThresholdClassifier};

/// How dispositions are decided for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageMode {
    /// Sharpness score against a threshold; Keep or Discard.
    Automatic,
    /// Operator review; Keep, Discard or Maybe.
    Manual,
}

impl std::fmt::Display for TriageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic => f.write_str("automatic"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Settings a new session starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Initial threshold for automatic mode.
    pub threshold: Threshold,
    /// Pin the threshold to the default.
    pub lock_default: bool,
    /// Category folder names used at realization.
    pub categories: CategoryNames,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            threshold: Threshold::DEFAULT,
            lock_default: false,
            categories: CategoryNames::default(),
        }
    }
}

#[derive(Debug, Clone)]
enum ModeState {
    Automatic {
        scores: Vec<Option<SharpnessScore>>,
        classifier: ThresholdClassifier,
    },
    Manual {
        tagger: ManualTagger,
    },
}

/// Whether an incoming score was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreApplication {
    Applied,
    /// The asset already has a score, or is not part of the session.
    Rejected,
}

/// All triage state for one folder selection.
///
/// The asset list and root never change after creation. Scores,
/// dispositions and progress change only through the owning
/// [`SessionOwner`](super::SessionOwner) or the operator methods here.
#[derive(Debug, Clone)]
pub struct ClassificationSession {
    collection: ImageCollection,
    generation: Generation,
    mode: ModeState,
    dispositions: Dispositions,
    scoring: Progress,
    realization: Option<Progress>,
    realizing: bool,
    categories: CategoryNames,
}

impl ClassificationSession {
    /// Creates a session for a freshly loaded collection.
    #[must_use]
    pub fn new(
        collection: ImageCollection,
        generation: Generation,
        mode: TriageMode,
        settings: &SessionSettings,
    ) -> Self {
        let len = collection.len();
        let (mode, scoring) = match mode {
            TriageMode::Automatic => {
                let mut classifier = ThresholdClassifier::new(settings.threshold);
                classifier.lock_to_default(settings.lock_default);
                (
                    ModeState::Automatic {
                        scores: vec![None; len],
                        classifier,
                    },
                    Progress::new(len),
                )
            }
            TriageMode::Manual => (
                ModeState::Manual {
                    tagger: ManualTagger::new(len),
                },
                Progress::default(),
            ),
        };
        Self {
            collection,
            generation,
            mode,
            dispositions: Dispositions::new(len),
            scoring,
            realization: None,
            realizing: false,
            categories: settings.categories.clone(),
        }
    }

    // === Read access ===

    /// Folder the session was created for.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.collection.root()
    }

    /// The immutable asset collection.
    #[must_use]
    pub const fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    /// Assets in collection order.
    #[must_use]
    pub fn assets(&self) -> &[ImageAsset] {
        self.collection.assets()
    }

    /// Generation the session's background work is tagged with.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Classification mode.
    #[must_use]
    pub const fn mode(&self) -> TriageMode {
        match self.mode {
            ModeState::Automatic { .. } => TriageMode::Automatic,
            ModeState::Manual { .. } => TriageMode::Manual,
        }
    }

    /// Current disposition of every asset.
    #[must_use]
    pub const fn dispositions(&self) -> &Dispositions {
        &self.dispositions
    }

    /// Current disposition of one asset.
    #[must_use]
    pub fn disposition(&self, id: AssetId) -> Disposition {
        self.dispositions.get(id)
    }

    /// Folder names used at realization.
    #[must_use]
    pub const fn categories(&self) -> &CategoryNames {
        &self.categories
    }

    /// Scoring progress; `0/0` in manual mode.
    #[must_use]
    pub const fn scoring_progress(&self) -> Progress {
        self.scoring
    }

    /// Progress of the latest realization, if one was started.
    #[must_use]
    pub const fn realization_progress(&self) -> Option<Progress> {
        self.realization
    }

    /// True while background work for this session is outstanding.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        self.realizing || !self.scoring.is_done()
    }

    /// Score of one asset, if it has arrived.
    #[must_use]
    pub fn score(&self, id: AssetId) -> Option<&SharpnessScore> {
        match &self.mode {
            ModeState::Automatic { scores, .. } => scores.get(id.index()).and_then(Option::as_ref),
            ModeState::Manual { .. } => None,
        }
    }

    /// Scores received so far, in collection order.
    pub fn scores(&self) -> impl Iterator<Item = &SharpnessScore> {
        let scores: &[Option<SharpnessScore>] = match &self.mode {
            ModeState::Automatic { scores, .. } => scores,
            ModeState::Manual { .. } => &[],
        };
        scores.iter().flatten()
    }

    /// Assets whose image could not be decoded.
    #[must_use]
    pub fn unscored(&self) -> Vec<&ImageAsset> {
        self.scores()
            .filter(|s| !s.is_scored())
            .filter_map(|s| self.collection.get(s.asset))
            .collect()
    }

    /// Threshold in automatic mode.
    #[must_use]
    pub const fn threshold(&self) -> Option<Threshold> {
        match &self.mode {
            ModeState::Automatic { classifier, .. } => Some(classifier.threshold()),
            ModeState::Manual { .. } => None,
        }
    }

    /// True when the threshold is pinned to the default.
    #[must_use]
    pub const fn is_threshold_locked(&self) -> bool {
        match &self.mode {
            ModeState::Automatic { classifier, .. } => classifier.is_locked(),
            ModeState::Manual { .. } => false,
        }
    }

    /// Cursor position in manual mode.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        match &self.mode {
            ModeState::Manual { tagger } => Some(tagger.current_index()),
            ModeState::Automatic { .. } => None,
        }
    }

    /// Asset under the cursor in manual mode.
    #[must_use]
    pub fn current_asset(&self) -> Option<&ImageAsset> {
        self.current_index()
            .and_then(|i| self.collection.get(AssetId::from_index(i)))
    }

    // === Automatic mode ===

    /// Changes the threshold and re-derives dispositions from the existing
    /// scores; nothing is rescored.
    ///
    /// # Errors
    ///
    /// Fails in manual mode, while locked, while realizing, or for values
    /// outside `0..=100`.
    pub fn set_threshold(&mut self, value: f64) -> Result<Threshold, TriageError> {
        if self.realizing {
            return Err(TriageError::RealizationInProgress);
        }
        let ModeState::Automatic { scores, classifier } = &mut self.mode else {
            return Err(TriageError::WrongMode {
                expected: "automatic",
            });
        };
        let threshold = classifier.set_threshold(value)?;
        self.dispositions = classifier.classify_all(scores);
        Ok(threshold)
    }

    /// Pins the threshold to the default or releases it, re-deriving
    /// dispositions.
    ///
    /// # Errors
    ///
    /// Fails in manual mode or while realizing.
    pub fn lock_to_default(&mut self, locked: bool) -> Result<Threshold, TriageError> {
        if self.realizing {
            return Err(TriageError::RealizationInProgress);
        }
        let ModeState::Automatic { scores, classifier } = &mut self.mode else {
            return Err(TriageError::WrongMode {
                expected: "automatic",
            });
        };
        classifier.lock_to_default(locked);
        self.dispositions = classifier.classify_all(scores);
        Ok(classifier.threshold())
    }

    /// Number of assets currently classified as blurry.
    #[must_use]
    pub fn blurry_count(&self) -> usize {
        match self.mode {
            ModeState::Automatic { .. } => self.dispositions.count(Disposition::Discard),
            ModeState::Manual { .. } => 0,
        }
    }

    // === Manual mode ===

    /// Tags the current asset and advances.
    ///
    /// # Errors
    ///
    /// Fails in automatic mode, while realizing, or for `Unclassified`.
    pub fn tag(&mut self, disposition: Disposition) -> Result<TagOutcome, TriageError> {
        if self.realizing {
            return Err(TriageError::RealizationInProgress);
        }
        match &mut self.mode {
            ModeState::Manual { tagger } => tagger.tag(&mut self.dispositions, disposition),
            ModeState::Automatic { .. } => Err(TriageError::WrongMode { expected: "manual" }),
        }
    }

    /// Moves to the next asset, wrapping around.
    ///
    /// # Errors
    ///
    /// Fails in automatic mode.
    pub fn advance(&mut self) -> Result<usize, TriageError> {
        Ok(self.tagger_mut()?.advance())
    }

    /// Moves to the previous asset, wrapping around.
    ///
    /// # Errors
    ///
    /// Fails in automatic mode.
    pub fn retreat(&mut self) -> Result<usize, TriageError> {
        Ok(self.tagger_mut()?.retreat())
    }

    fn tagger_mut(&mut self) -> Result<&mut ManualTagger, TriageError> {
        match &mut self.mode {
            ModeState::Manual { tagger } => Ok(tagger),
            ModeState::Automatic { .. } => Err(TriageError::WrongMode { expected: "manual" }),
        }
    }

    // === Realization ===

    /// Builds the plan for copying files into category folders.
    ///
    /// Automatic sessions need every score applied; assets that failed to
    /// decode are excluded and listed. Manual sessions need every asset
    /// tagged.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ScoringIncomplete`], [`TriageError::Untagged`]
    /// or [`TriageError::RealizationInProgress`].
    pub fn realization_plan(&self) -> Result<RealizationPlan, TriageError> {
        if self.realizing {
            return Err(TriageError::RealizationInProgress);
        }
        match self.mode {
            ModeState::Automatic { .. } if !self.scoring.is_done() => {
                Err(TriageError::ScoringIncomplete {
                    completed: self.scoring.completed,
                    total: self.scoring.total,
                })
            }
            ModeState::Manual { .. } if !self.dispositions.all_decided() => {
                Err(TriageError::Untagged {
                    remaining: self.dispositions.undecided(),
                })
            }
            _ => Ok(RealizationPlan::new(
                &self.collection,
                &self.dispositions,
                self.categories.clone(),
            )),
        }
    }

    // === Owner-applied updates ===

    /// Stores a score if the asset has none yet and advances progress.
    pub(crate) fn apply_score(&mut self, score: SharpnessScore) -> ScoreApplication {
        let ModeState::Automatic { scores, classifier } = &mut self.mode else {
            return ScoreApplication::Rejected;
        };
        let Some(slot) = scores.get_mut(score.asset.index()) else {
            return ScoreApplication::Rejected;
        };
        if slot.is_some() {
            return ScoreApplication::Rejected;
        }
        self.dispositions.set(score.asset, classifier.classify(&score));
        *slot = Some(score);
        self.scoring.advance();
        ScoreApplication::Applied
    }

    /// Assets with no score yet, for re-dispatch.
    pub(crate) fn awaiting_score(&self) -> Vec<ImageAsset> {
        match &self.mode {
            ModeState::Automatic { scores, .. } => self
                .collection
                .iter()
                .filter(|a| scores.get(a.discovery_index).is_some_and(Option::is_none))
                .cloned()
                .collect(),
            ModeState::Manual { .. } => Vec::new(),
        }
    }

    pub(crate) fn begin_realization(&mut self, total: usize) {
        self.realizing = true;
        self.realization = Some(Progress::new(total));
    }

    pub(crate) fn apply_copy(&mut self) -> Progress {
        let progress = self.realization.get_or_insert_with(Progress::default);
        progress.advance();
        *progress
    }

    pub(crate) fn finish_realization(&mut self) {
        self.realizing = false;
    }

    /// Takes over a newer generation after a failed re-selection. A running
    /// realization stays running until the owner sees it finish.
    pub(crate) fn rebind(&mut self, generation: Generation) {
        self.generation = generation;
    }
}
