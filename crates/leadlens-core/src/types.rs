use serde::{Deserialize, Serialize};

/// One entry in a profile's experience history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub is_current: bool,
    /// Link to the company's own profile page, when the source exposes one.
    pub company_url: Option<String>,
}

/// Structured result of one profile extraction.
///
/// Produced all-or-nothing by the profile data source: a failed extraction
/// yields no record at all, never a partially populated one. Immutable for
/// the duration of one scoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub full_name: String,
    pub headline: String,
    pub experience: Vec<Experience>,
    pub location: String,
    /// Whole days since the most recent post, clamped at 0.
    /// `None` when no usable post timestamp was found; the feature deriver
    /// applies the missing-data fallback.
    pub activity_days: Option<i64>,
}

impl ProfileRecord {
    /// The experience entry flagged current, falling back to the first entry.
    #[must_use]
    pub fn current_experience(&self) -> Option<&Experience> {
        self.experience
            .iter()
            .find(|e| e.is_current)
            .or_else(|| self.experience.first())
    }
}

/// One social-activity post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    /// Posting time in epoch milliseconds.
    pub posted_at_ms: i64,
    /// Free-form source payload, kept for operator inspection only.
    pub metadata: serde_json::Value,
}

/// The four manually entered company attributes.
///
/// Free text, no validation; a missing field is the empty string. These are
/// the only company-level signal in scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualCompanyFields {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub annual_revenue: String,
    #[serde(default)]
    pub industry: String,
}
