//! Threshold classification of sharpness scores.

use crate::domain::{Disposition, Dispositions, SharpnessScore, Threshold, TriageError};

/// Maps one score to a disposition.
///
/// `Discard` when the value is below the threshold, `Keep` otherwise; a
/// value equal to the threshold is kept. Unscored assets stay
/// `Unclassified`.
#[must_use]
pub fn classify(score: &SharpnessScore, threshold: Threshold) -> Disposition {
    if !score.is_scored() {
        return Disposition::Unclassified;
    }
    if score.value < threshold.value() {
        Disposition::Discard
    } else {
        Disposition::Keep
    }
}

/// Holds the threshold and the lock-to-default switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClassifier {
    threshold: Threshold,
    locked: bool,
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new(Threshold::DEFAULT)
    }
}

impl ThresholdClassifier {
    /// Unlocked classifier at `threshold`.
    #[must_use]
    pub const fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            locked: false,
        }
    }

    /// Current threshold.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// True while pinned to the default.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Changes the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ThresholdOutOfRange`] for values outside
    /// `0..=100` and [`TriageError::ThresholdLocked`] while locked.
    pub fn set_threshold(&mut self, value: f64) -> Result<Threshold, TriageError> {
        let threshold = Threshold::new(value)?;
        if self.locked {
            return Err(TriageError::ThresholdLocked);
        }
        self.threshold = threshold;
        Ok(threshold)
    }

    /// Pins the threshold to the default (`true`) or releases it (`false`).
    ///
    /// Releasing keeps the default value until the next `set_threshold`.
    pub fn lock_to_default(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.threshold = Threshold::DEFAULT;
        }
    }

    /// Classifies one score at the current threshold.
    #[must_use]
    pub fn classify(&self, score: &SharpnessScore) -> Disposition {
        classify(score, self.threshold)
    }

    /// Re-derives every disposition from `scores`.
    ///
    /// Assets without a score, or whose score failed, come out
    /// `Unclassified`.
    #[must_use]
    pub fn classify_all(&self, scores: &[Option<SharpnessScore>]) -> Dispositions {
        let mut dispositions = Dispositions::new(scores.len());
        for score in scores.iter().flatten() {
            dispositions.set(score.asset, self.classify(score));
        }
        dispositions
    }
}
