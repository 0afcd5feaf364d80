use serde::Serialize;

/// The closed set of feature names the deriver produces, in canonical order.
///
/// This order is the deriver's own; the model binds to its manifest's column
/// order, and the aligner bridges the two by name. Keep the weight tables and
/// bucket thresholds in sync with the frozen artifact when retraining.
pub const FEATURE_NAMES: [&str; 37] = [
    "is_ceo",
    "is_c_level",
    "is_evp_svp",
    "is_vp",
    "is_director",
    "is_manager",
    "is_officer",
    "in_lending",
    "in_tech",
    "in_operations",
    "in_risk",
    "in_finance",
    "in_strategy",
    "designation_length",
    "designation_word_count",
    "seniority_score",
    "dept_score",
    "size_numeric",
    "size_51_200",
    "size_201_500",
    "size_501_1000",
    "size_1001_5000",
    "size_5000_plus",
    "revenue_millions",
    "revenue_category",
    "activity_days",
    "is_active_week",
    "is_active_month",
    "is_consumer_lending",
    "is_commercial_banking",
    "is_retail_banking",
    "is_fintech",
    "is_credit_union",
    "Desig_Score",
    "Size_Score",
    "Revenue_Score",
    "Activity_Score",
];

/// A single-row numeric feature vector over the closed key set above.
///
/// Only the deriver constructs one; it is never mutated afterwards. Boolean
/// flags are stored as 0.0/1.0 for direct modeling compatibility.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    entries: Vec<(&'static str, f64)>,
}

impl FeatureVector {
    /// Wraps derived entries. The deriver lists them in `FEATURE_NAMES`
    /// order; the debug assertion catches drift between the two.
    pub(crate) fn from_entries(entries: Vec<(&'static str, f64)>) -> Self {
        debug_assert_eq!(entries.len(), FEATURE_NAMES.len());
        debug_assert!(entries
            .iter()
            .zip(FEATURE_NAMES.iter())
            .all(|((name, _), expected)| name == expected));
        Self { entries }
    }

    /// Looks up a feature value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Iterates entries in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One named value in the debug trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceField {
    pub name: String,
    pub value: serde_json::Value,
}

/// Operator-facing record of every raw input and derived feature value.
///
/// Insertion-ordered so raw fields appear before the features computed from
/// them. Display-only: the model never reads it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DebugTrace {
    fields: Vec<TraceField>,
}

impl DebugTrace {
    pub(crate) fn push(&mut self, name: &str, value: impl Into<serde_json::Value>) {
        self.fields.push(TraceField {
            name: name.to_owned(),
            value: value.into(),
        });
    }

    /// Looks up a traced value by name (first occurrence).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceField> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
