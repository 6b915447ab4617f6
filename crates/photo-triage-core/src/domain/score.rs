//! Sharpness scores, thresholds and progress counters.

use serde::Serialize;

use super::{AssetId, TriageError};

/// Outcome of scoring one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// The image decoded and `value` holds its Laplacian variance.
    Scored,
    /// The image could not be decoded; `value` is meaningless.
    DecodeFailed,
}

/// Blur metric for one asset. Higher is sharper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharpnessScore {
    /// Asset the score belongs to.
    pub asset: AssetId,
    /// Variance of the Laplacian; `0.0` when decoding failed.
    pub value: f64,
    /// Whether the value is usable.
    pub status: ScoreStatus,
    /// Decoder message when `status` is `DecodeFailed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl SharpnessScore {
    /// A successfully computed score.
    #[must_use]
    pub const fn scored(asset: AssetId, value: f64) -> Self {
        Self {
            asset,
            value,
            status: ScoreStatus::Scored,
            failure: None,
        }
    }

    /// A score for an image that failed to decode.
    #[must_use]
    pub fn decode_failed(asset: AssetId, reason: impl Into<String>) -> Self {
        Self {
            asset,
            value: 0.0,
            status: ScoreStatus::DecodeFailed,
            failure: Some(reason.into()),
        }
    }

    /// True when `value` may be classified.
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        matches!(self.status, ScoreStatus::Scored)
    }
}

/// Sharpness threshold validated to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Lower bound of the accepted range.
    pub const MIN: f64 = 0.0;
    /// Upper bound of the accepted range; also the default.
    pub const MAX: f64 = 100.0;
    /// Value used when nothing is configured and when locked to default.
    pub const DEFAULT: Self = Self(Self::MAX);

    /// Validates a raw threshold.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ThresholdOutOfRange`] for values outside
    /// `0..=100`, including NaN.
    pub fn new(value: f64) -> Result<Self, TriageError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TriageError::ThresholdOutOfRange { value })
        }
    }

    /// Raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Count of results applied out of a known total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Results applied so far.
    pub completed: usize,
    /// Results expected.
    pub total: usize,
}

impl Progress {
    /// Zero progress toward `total`.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Advances by one, saturating at `total`. Returns false if already done.
    pub fn advance(&mut self) -> bool {
        if self.completed < self.total {
            self.completed += 1;
            true
        } else {
            false
        }
    }

    /// True once every expected result was applied.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}
