use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::ModelError;

/// Feature-schema manifest persisted alongside the model artifact.
///
/// Dictates the exact column order the classifier binds to and the mapping
/// from class index to human label. Loaded once at startup; a missing or
/// malformed manifest is a fatal initialization error, never a per-request
/// one.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaManifest {
    /// Ordered list of expected feature names — the column contract.
    pub feature_names: Vec<String>,
    /// Class index (as a string key, matching the training exporter) → label.
    pub reverse_mapping: BTreeMap<String, String>,
    /// When present, `revenue_category` is a categorical feature: its raw
    /// bucket value must be replaced by its index in this list before
    /// alignment (unknown value ⇒ 0).
    #[serde(default)]
    pub revenue_encoder_classes: Option<Vec<i64>>,
}

impl SchemaManifest {
    /// Reads and validates a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// [`ModelError::Io`] / [`ModelError::Parse`] on unreadable or malformed
    /// files, [`ModelError::InvalidManifest`] when required keys are empty.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.is_empty() {
            return Err(ModelError::InvalidManifest(
                "feature_names is empty".to_owned(),
            ));
        }
        if self.reverse_mapping.is_empty() {
            return Err(ModelError::InvalidManifest(
                "reverse_mapping is empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Label for a class index, or `None` when the index is unmapped.
    #[must_use]
    pub fn label_for(&self, class_index: usize) -> Option<&str> {
        self.reverse_mapping
            .get(&class_index.to_string())
            .map(String::as_str)
    }

    /// Categorical encoding for a raw `revenue_category` bucket, when the
    /// manifest declares encoder classes. Unknown values encode as 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn encode_revenue_category(&self, raw: f64) -> f64 {
        match &self.revenue_encoder_classes {
            Some(classes) => classes
                .iter()
                .position(|c| *c == raw as i64)
                .map_or(0.0, |idx| idx as f64),
            None => raw,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).expect("valid test manifest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "feature_names": ["a", "b", "revenue_category"],
        "reverse_mapping": {"0": "COLD", "1": "COOL", "2": "WARM", "3": "HOT"}
    }"#;

    #[test]
    fn parses_minimal_manifest() {
        let m = SchemaManifest::from_json(MANIFEST);
        assert_eq!(m.feature_names.len(), 3);
        assert_eq!(m.label_for(3), Some("HOT"));
        assert_eq!(m.label_for(9), None);
        assert!(m.revenue_encoder_classes.is_none());
    }

    #[test]
    fn validate_rejects_empty_feature_names() {
        let m = SchemaManifest::from_json(
            r#"{"feature_names": [], "reverse_mapping": {"0": "COLD"}}"#,
        );
        assert!(matches!(
            m.validate(),
            Err(ModelError::InvalidManifest(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_reverse_mapping() {
        let m = SchemaManifest::from_json(r#"{"feature_names": ["a"], "reverse_mapping": {}}"#);
        assert!(matches!(
            m.validate(),
            Err(ModelError::InvalidManifest(_))
        ));
    }

    #[test]
    fn revenue_category_passthrough_without_encoder() {
        let m = SchemaManifest::from_json(MANIFEST);
        assert_eq!(m.encode_revenue_category(3.0), 3.0);
    }

    #[test]
    fn revenue_category_encoded_through_classes() {
        let m = SchemaManifest::from_json(
            r#"{
                "feature_names": ["revenue_category"],
                "reverse_mapping": {"0": "COLD"},
                "revenue_encoder_classes": [0, 2, 3, 4]
            }"#,
        );
        // Bucket 3 sits at index 2 of the encoder classes.
        assert_eq!(m.encode_revenue_category(3.0), 2.0);
        // Bucket 1 was never seen in training -> index 0.
        assert_eq!(m.encode_revenue_category(1.0), 0.0);
    }
}
