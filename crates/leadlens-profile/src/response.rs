//! Serde mappings for the actor platform's response payloads.

use leadlens_core::{Experience, PostRecord, ProfileRecord};
use serde::Deserialize;

/// Envelope around actor-run metadata (`POST /v2/acts/{actor}/runs` and
/// `GET /v2/actor-runs/{id}` share the shape).
#[derive(Debug, Deserialize)]
pub(crate) struct RunEnvelope {
    pub data: RunData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunData {
    pub id: String,
    #[serde(default)]
    pub default_dataset_id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLocation {
    #[serde(default)]
    pub full: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawBasicInfo {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub location: RawLocation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub company_linkedin_url: Option<String>,
}

/// First dataset item of a successful profile-actor run.
#[derive(Debug, Deserialize)]
pub(crate) struct RawProfile {
    #[serde(default)]
    pub basic_info: RawBasicInfo,
    #[serde(default)]
    pub experience: Vec<RawExperience>,
}

impl RawProfile {
    /// All-or-nothing mapping into the domain record; `activity_days` is
    /// attached later, once posts have been fetched.
    pub(crate) fn into_record(self, activity_days: Option<i64>) -> ProfileRecord {
        ProfileRecord {
            full_name: self.basic_info.fullname,
            headline: self.basic_info.headline,
            experience: self
                .experience
                .into_iter()
                .map(|e| Experience {
                    title: e.title,
                    company: e.company,
                    is_current: e.is_current,
                    company_url: e.company_linkedin_url,
                })
                .collect(),
            location: self.basic_info.location.full,
            activity_days,
        }
    }
}

/// One item from the posts actor. Posts without a usable timestamp are
/// dropped during mapping.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPost {
    #[serde(default)]
    pub posted_at: Option<RawPostedAt>,
    #[serde(flatten)]
    pub rest: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPostedAt {
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RawPost {
    pub(crate) fn into_record(self) -> Option<PostRecord> {
        let posted_at_ms = self.posted_at.and_then(|p| p.timestamp)?;
        Some(PostRecord {
            posted_at_ms,
            metadata: self.rest,
        })
    }
}
