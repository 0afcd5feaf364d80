use std::path::Path;

use serde::Serialize;

use leadlens_features::FeatureVector;

use crate::{ModelArtifact, ModelError, SchemaManifest};

/// Sentinel label for a class index the manifest does not map.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// How many importance-ranked features are considered before re-ranking by
/// observed value magnitude.
const EXPLAIN_CANDIDATES: usize = 30;

/// Probability of one class, keyed by its human label.
#[derive(Debug, Clone, Serialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// One feature's contribution to a specific prediction.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureContribution {
    pub feature: String,
    /// The aligned value observed for this subject.
    pub value: f64,
    /// Global gain-based importance from the trained classifier.
    pub importance: f64,
    /// `importance × |value|` — keeps important-but-zero features from
    /// dominating the explanation for this subject.
    pub impact: f64,
}

/// Classification outcome for one subject.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub label: String,
    /// Probability of the predicted class, in [0, 1].
    pub confidence: f64,
    /// Full distribution in class-index order; every class is present even
    /// at probability 0, and the values sum to 1 within floating tolerance.
    pub probabilities: Vec<ClassProbability>,
    /// Highest-impact features first. Empty when the artifact exposes no
    /// importance information.
    pub top_features: Vec<FeatureContribution>,
}

/// Manifest summary exposed to operators (feature count, labels, whether
/// explanations are available).
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub feature_count: usize,
    pub class_labels: Vec<String>,
    pub has_importances: bool,
}

/// The loaded classifier plus its schema manifest.
///
/// Immutable after [`Predictor::load`]; share it behind an `Arc` when the
/// surrounding service handles concurrent requests.
pub struct Predictor {
    artifact: ModelArtifact,
    manifest: SchemaManifest,
}

impl Predictor {
    /// Loads the model artifact and manifest from disk.
    ///
    /// # Errors
    ///
    /// Any [`ModelError`] here is fatal to the caller: there is no safe
    /// degraded mode for scoring without a model.
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self, ModelError> {
        let artifact = ModelArtifact::load(model_path)?;
        let manifest = SchemaManifest::load(manifest_path)?;
        tracing::info!(
            features = manifest.feature_names.len(),
            classes = artifact.n_classes(),
            importances = artifact.has_importances(),
            "model artifact loaded"
        );
        Ok(Self { artifact, manifest })
    }

    #[must_use]
    pub fn new(artifact: ModelArtifact, manifest: SchemaManifest) -> Self {
        Self { artifact, manifest }
    }

    #[must_use]
    pub fn manifest(&self) -> &SchemaManifest {
        &self.manifest
    }

    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            feature_count: self.manifest.feature_names.len(),
            class_labels: (0..self.artifact.n_classes())
                .map(|idx| self.label_for(idx))
                .collect(),
            has_importances: self.artifact.has_importances(),
        }
    }

    /// Aligns a derived feature vector to the manifest's exact column order.
    ///
    /// Names the manifest expects but the vector lacks become 0.0; vector
    /// entries the manifest does not list are dropped. `activity_days` is
    /// clamped to the modeled [0, 180] range with the week/month flags
    /// recomputed from the clamped value, and `revenue_category` goes
    /// through the manifest's categorical encoder when one is declared.
    ///
    /// Mandatory before every prediction: the classifier binds to column
    /// positions, not names, so an un-aligned row silently corrupts output.
    #[must_use]
    pub fn align(&self, features: &FeatureVector) -> Vec<f64> {
        let activity_days = features
            .get("activity_days")
            .map(|d| d.clamp(0.0, 180.0));

        self.manifest
            .feature_names
            .iter()
            .map(|name| {
                let raw = features.get(name).unwrap_or(0.0);
                match (name.as_str(), activity_days) {
                    ("activity_days", Some(days)) => days,
                    ("is_active_week", Some(days)) => f64::from(u8::from(days <= 7.0)),
                    ("is_active_month", Some(days)) => f64::from(u8::from(days <= 30.0)),
                    ("revenue_category", _) => self.manifest.encode_revenue_category(raw),
                    _ if raw.is_finite() => raw,
                    // Defensive coercion mirrors the missing-column default.
                    _ => 0.0,
                }
            })
            .collect()
    }

    /// Classifies one aligned row.
    ///
    /// # Errors
    ///
    /// [`ModelError::Inference`] when the classifier faults on the row; the
    /// caller reports "no prediction produced" rather than crashing.
    pub fn predict(&self, aligned: &[f64]) -> Result<PredictionResult, ModelError> {
        let probs = self.artifact.predict_proba(aligned)?;

        let (pred_idx, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| ModelError::Inference("empty probability vector".to_owned()))?;

        let probabilities = probs
            .iter()
            .copied()
            .enumerate()
            .map(|(idx, probability)| ClassProbability {
                label: self.label_for(idx),
                probability,
            })
            .collect();

        Ok(PredictionResult {
            label: self.label_for(pred_idx),
            confidence,
            probabilities,
            top_features: Vec::new(),
        })
    }

    /// Ranks the features contributing to this row's prediction.
    ///
    /// Takes the [`EXPLAIN_CANDIDATES`] most important features globally,
    /// re-ranks them by `importance × |value|`, and returns the top `top_n`.
    /// Empty when the artifact carries no importance information.
    #[must_use]
    pub fn explain(&self, aligned: &[f64], top_n: usize) -> Vec<FeatureContribution> {
        let Some(importances) = &self.artifact.feature_importances else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = importances.iter().copied().enumerate().collect();
        ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        ranked.truncate(EXPLAIN_CANDIDATES);

        let mut contributions: Vec<FeatureContribution> = ranked
            .into_iter()
            .filter_map(|(idx, importance)| {
                let feature = self.manifest.feature_names.get(idx)?;
                let value = aligned.get(idx).copied().unwrap_or(0.0);
                Some(FeatureContribution {
                    feature: feature.clone(),
                    value,
                    importance,
                    impact: importance * value.abs(),
                })
            })
            .collect();
        contributions.sort_by(|a, b| b.impact.total_cmp(&a.impact));
        contributions.truncate(top_n);
        contributions
    }

    /// Aligns, predicts, and explains in one step.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::Inference`] from [`Predictor::predict`].
    pub fn score(
        &self,
        features: &FeatureVector,
        top_n: usize,
    ) -> Result<PredictionResult, ModelError> {
        let aligned = self.align(features);
        let mut result = self.predict(&aligned)?;
        result.top_features = self.explain(&aligned, top_n);
        Ok(result)
    }

    fn label_for(&self, class_index: usize) -> String {
        self.manifest
            .label_for(class_index)
            .unwrap_or(UNKNOWN_LABEL)
            .to_owned()
    }
}
