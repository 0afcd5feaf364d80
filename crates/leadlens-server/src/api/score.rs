use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use leadlens_core::{ManualCompanyFields, ProfileRecord};
use leadlens_features::{derive, DebugTrace};
use leadlens_model::PredictionResult;

use super::{ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const DEFAULT_TOP_FEATURES: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub annual_revenue: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub top_features: Option<usize>,
}

/// Outcome of the profile-extraction stage for one scoring request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// A profile was fetched and feeds the feature deriver.
    Ok,
    /// No URL was given, or no extraction client is configured.
    Skipped,
    /// Extraction was attempted and failed; scoring fell back to manual
    /// fields only.
    Failed,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub full_name: String,
    pub headline: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: String,
    pub activity_days: Option<i64>,
}

impl From<&ProfileRecord> for ProfileSummary {
    fn from(record: &ProfileRecord) -> Self {
        let current = record.current_experience();
        Self {
            full_name: record.full_name.clone(),
            headline: record.headline.clone(),
            title: current.map(|e| e.title.clone()),
            company: current.map(|e| e.company.clone()),
            location: record.location.clone(),
            activity_days: record.activity_days,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreData {
    pub extraction: ExtractionStatus,
    pub profile: Option<ProfileSummary>,
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub debug_trace: DebugTrace,
}

/// Full scoring pipeline: extract, derive, align, predict, explain.
///
/// Extraction and prediction failures are recovered here, never
/// propagated: the response always carries the debug trace, and a
/// prediction failure yields `prediction: null` with an error note at
/// HTTP 200. The caller decides how to render a partial result.
pub async fn score(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ScoreRequest>,
) -> impl IntoResponse {
    let _in_flight = state.score_gate.lock().await;

    let (extraction, profile) = match (request.profile_url.as_deref(), &state.profile_client) {
        (Some(url), Some(client)) => {
            match client.extract(url, state.posts_limit, Utc::now()).await {
                Ok(record) => (ExtractionStatus::Ok, Some(record)),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "profile extraction failed; scoring from manual fields only"
                    );
                    (ExtractionStatus::Failed, None)
                }
            }
        }
        (Some(_), None) => {
            tracing::warn!("profile URL given but no extraction client configured");
            (ExtractionStatus::Skipped, None)
        }
        (None, _) => (ExtractionStatus::Skipped, None),
    };

    let manual = ManualCompanyFields {
        company_name: request.company_name,
        company_size: request.company_size,
        annual_revenue: request.annual_revenue,
        industry: request.industry,
    };
    let (features, debug_trace) = derive(profile.as_ref(), &manual);

    let top_n = request.top_features.unwrap_or(DEFAULT_TOP_FEATURES);
    let (prediction, error) = match state.predictor.score(&features, top_n) {
        Ok(result) => (Some(result), None),
        Err(err) => {
            tracing::error!(error = %err, "prediction failed");
            (None, Some(err.to_string()))
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: ScoreData {
                extraction,
                profile: profile.as_ref().map(ProfileSummary::from),
                prediction,
                error,
                debug_trace,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

/// Schema summary for the loaded model: feature count, class labels, and
/// whether per-feature importances are available for explanations.
pub async fn model_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: state.predictor.summary(),
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}
