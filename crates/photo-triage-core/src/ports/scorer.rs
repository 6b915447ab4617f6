//! Scorer port used by the background scoring pool.

use crate::domain::{ImageAsset, SharpnessScore};

/// Produces a blur metric for one asset.
///
/// Implementations are pure with respect to session state; decode failures
/// are reported through [`SharpnessScore::decode_failed`], never by panicking.
pub trait SharpnessScorer: Send + Sync {
    /// Scores a single asset.
    fn score(&self, asset: &ImageAsset) -> SharpnessScore;
}
