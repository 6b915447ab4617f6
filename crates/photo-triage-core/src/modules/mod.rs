//! Triage modules.
//!
//! Each module is a pure piece of the pipeline: scoring, classification,
//! manual tagging and realization. None of them owns session state.

mod classifier;
mod realizer;
mod sharpness;
mod tagger;

pub use classifier::{classify, ThresholdClassifier};
pub use realizer::{realize, RealizationPlan};
pub use sharpness::{laplacian_variance, LaplacianScorer};
pub use tagger::{ManualTagger, TagOutcome};
