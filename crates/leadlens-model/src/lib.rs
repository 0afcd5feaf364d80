//! Model serving for LeadLens.
//!
//! Loads the frozen classifier artifact and its feature-schema manifest once
//! at startup, aligns derived feature vectors to the manifest's exact column
//! order, runs probability classification, and ranks the features that
//! contributed to a given prediction.
//!
//! The artifact and manifest are read-only after load and safe to share
//! behind an `Arc` across requests.

mod artifact;
mod error;
mod manifest;
mod predictor;

pub use artifact::ModelArtifact;
pub use error::ModelError;
pub use manifest::SchemaManifest;
pub use predictor::{
    ClassProbability, FeatureContribution, ModelSummary, PredictionResult, Predictor, UNKNOWN_LABEL,
};
