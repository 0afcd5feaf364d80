use std::path::Path;

use serde::Deserialize;

use crate::ModelError;

/// One node of a decision tree, index-linked within its tree's `nodes` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree contributing margin to a single class.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Tree {
    pub class_index: usize,
    /// Node 0 is the root.
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walks the tree for one feature row. Rows route left when
    /// `row[feature] < threshold`.
    fn evaluate(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut index = 0usize;
        // A well-formed tree terminates within nodes.len() hops; the bound
        // turns a malformed cyclic tree into an error instead of a hang.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().ok_or_else(|| {
                        ModelError::Inference(format!(
                            "tree references feature index {feature} but row has {} columns",
                            row.len()
                        ))
                    })?;
                    index = if value < *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::Inference(format!(
                        "tree node index {index} out of range"
                    )))
                }
            }
        }
        Err(ModelError::Inference(
            "tree walk did not reach a leaf".to_owned(),
        ))
    }
}

/// Frozen gradient-boosted tree ensemble with per-class softmax margins.
///
/// Consumed as an opaque, pre-trained artifact: this crate only evaluates
/// it, it never trains or mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub(crate) n_classes: usize,
    /// Per-class margin bias added before the tree contributions.
    pub(crate) base_score: Vec<f64>,
    pub(crate) trees: Vec<Tree>,
    /// Global gain-based importance per manifest feature column. Absent when
    /// the training exporter did not emit importances; explanation then
    /// degrades to an empty list.
    #[serde(default)]
    pub(crate) feature_importances: Option<Vec<f64>>,
}

impl ModelArtifact {
    /// Reads and validates an artifact from a JSON file.
    ///
    /// # Errors
    ///
    /// [`ModelError::Io`] / [`ModelError::Parse`] on unreadable or malformed
    /// files, [`ModelError::InvalidArtifact`] on internal inconsistencies
    /// (bad class indices, out-of-range node links).
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.n_classes == 0 {
            return Err(ModelError::InvalidArtifact("n_classes is zero".to_owned()));
        }
        if self.base_score.len() != self.n_classes {
            return Err(ModelError::InvalidArtifact(format!(
                "base_score has {} entries for {} classes",
                self.base_score.len(),
                self.n_classes
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.class_index >= self.n_classes {
                return Err(ModelError::InvalidArtifact(format!(
                    "tree {i} targets class {} of {}",
                    tree.class_index, self.n_classes
                )));
            }
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidArtifact(format!("tree {i} is empty")));
            }
            for node in &tree.nodes {
                if let Node::Split { left, right, .. } = node {
                    if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {i} links to node {} out of {}",
                            left.max(right),
                            tree.nodes.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[must_use]
    pub fn has_importances(&self) -> bool {
        self.feature_importances.is_some()
    }

    /// Per-class probabilities for one aligned feature row.
    ///
    /// Sums each class's base score and tree margins, then applies a
    /// max-subtracted softmax so large margins cannot overflow.
    ///
    /// # Errors
    ///
    /// [`ModelError::Inference`] when a tree walk fails or a margin is
    /// non-finite.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        let mut margins = self.base_score.clone();
        for tree in &self.trees {
            margins[tree.class_index] += tree.evaluate(row)?;
        }
        if margins.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::Inference(
                "non-finite class margin".to_owned(),
            ));
        }

        let max = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(ModelError::Inference(
                "softmax normalization failed".to_owned(),
            ));
        }
        Ok(exp.iter().map(|e| e / total).collect())
    }

    #[cfg(test)]
    pub(crate) fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).expect("valid test artifact")
    }
}
