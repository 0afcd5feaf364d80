use std::time::Duration;

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};

use leadlens_core::{PostRecord, ProfileRecord};

use crate::error::ProfileError;
use crate::response::{RawPost, RawProfile, RunEnvelope};

const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Actor that scrapes one profile's structured details.
const PROFILE_ACTOR: &str = "apimaestro~linkedin-profile-detail";
/// Actor that scrapes a profile's recent posts.
const POSTS_ACTOR: &str = "apimaestro~linkedin-batch-profile-posts-scraper";

/// Extracts the profile username from a user-supplied profile URL.
///
/// The username is the path segment after `linkedin.com/in/`, with any
/// trailing path, query, or fragment stripped. Returns `None` when the
/// marker is absent or the segment is empty.
#[must_use]
pub fn extract_username(profile_url: &str) -> Option<String> {
    let url = profile_url.trim();
    let (_, rest) = url.split_once("linkedin.com/in/")?;
    let username = rest.split(['/', '?', '#']).next().unwrap_or("").trim();
    if username.is_empty() {
        None
    } else {
        Some(username.to_owned())
    }
}

/// Whole days between `now` and the newest post's timestamp, floored at 0.
///
/// `None` when there are no posts or no post carries a usable timestamp.
/// "now" is a parameter so callers (and tests) control the clock.
#[must_use]
pub fn activity_days_from_posts(posts: &[PostRecord], now: DateTime<Utc>) -> Option<i64> {
    let newest_ms = posts.iter().map(|p| p.posted_at_ms).max()?;
    let posted = DateTime::from_timestamp_millis(newest_ms)?;
    Some((now - posted).num_days().max(0))
}

/// Client for the actor platform's v2 REST API.
///
/// The profile actor is asynchronous on the provider side; [`ProfileClient`]
/// drives the start-run / poll-status / fetch-dataset protocol behind one
/// call, bounded by `run_timeout`. Use [`ProfileClient::with_base_url`] to
/// point at a mock server in tests.
pub struct ProfileClient {
    client: Client,
    api_token: String,
    base_url: String,
    run_timeout: Duration,
    poll_interval: Duration,
}

impl ProfileClient {
    /// Creates a client pointed at the production actor platform.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_token: &str,
        request_timeout_secs: u64,
        run_timeout_secs: u64,
        poll_interval_secs: u64,
    ) -> Result<Self, ProfileError> {
        Self::with_base_url(
            api_token,
            request_timeout_secs,
            run_timeout_secs,
            poll_interval_secs,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_token: &str,
        request_timeout_secs: u64,
        run_timeout_secs: u64,
        poll_interval_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadlens/0.1 (lead-scoring)")
            .build()?;
        Ok(Self {
            client,
            api_token: api_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            run_timeout: Duration::from_secs(run_timeout_secs),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }

    /// Full extraction for one profile URL: profile details, recent posts,
    /// and the activity-days signal computed against `now`.
    ///
    /// Posts are best-effort — a posts failure degrades to "no activity
    /// signal" with a warning, while a profile failure fails the whole
    /// extraction (the record is all-or-nothing).
    ///
    /// # Errors
    ///
    /// - [`ProfileError::InvalidProfileUrl`] — URL lacks the profile marker.
    /// - [`ProfileError::RunFailed`] / [`ProfileError::RunTimeout`] — the
    ///   provider-side run ended badly or outlived the configured deadline.
    /// - [`ProfileError::Http`] / [`ProfileError::UnexpectedStatus`] /
    ///   [`ProfileError::Deserialize`] — transport or payload failures.
    pub async fn extract(
        &self,
        profile_url: &str,
        posts_limit: usize,
        now: DateTime<Utc>,
    ) -> Result<ProfileRecord, ProfileError> {
        let username =
            extract_username(profile_url).ok_or_else(|| ProfileError::InvalidProfileUrl {
                url: profile_url.to_owned(),
            })?;

        let raw = self.run_profile_actor(&username).await?;

        let posts = match self.fetch_recent_posts(&username, posts_limit).await {
            Ok(posts) => posts,
            Err(err) => {
                tracing::warn!(
                    username,
                    error = %err,
                    "posts fetch failed; continuing without activity signal"
                );
                Vec::new()
            }
        };
        let activity_days = activity_days_from_posts(&posts, now);

        Ok(raw.into_record(activity_days))
    }

    /// Fetches structured profile details for a username.
    ///
    /// The returned record has no activity signal; [`ProfileClient::extract`]
    /// attaches one from recent posts.
    ///
    /// # Errors
    ///
    /// See [`ProfileClient::extract`].
    pub async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, ProfileError> {
        let raw = self.run_profile_actor(username).await?;
        Ok(raw.into_record(None))
    }

    /// Fetches up to `limit` recent posts, newest first.
    ///
    /// Posts without a usable timestamp are dropped; ordering ties are
    /// broken deterministically by the stable sort.
    ///
    /// # Errors
    ///
    /// [`ProfileError::UnexpectedStatus`] on a non-2xx response,
    /// [`ProfileError::Deserialize`] when the payload is not a post list.
    pub async fn fetch_recent_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PostRecord>, ProfileError> {
        let url = format!(
            "{}/v2/acts/{POSTS_ACTOR}/run-sync-get-dataset-items",
            self.base_url
        );
        let payload = serde_json::json!({
            "usernames": [username],
            "includeEmail": false,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let raw_posts: Vec<RawPost> =
            serde_json::from_str(&body).map_err(|source| ProfileError::Deserialize {
                context: format!("posts for {username}"),
                source,
            })?;

        let mut posts: Vec<PostRecord> =
            raw_posts.into_iter().filter_map(RawPost::into_record).collect();
        posts.sort_by_key(|p| std::cmp::Reverse(p.posted_at_ms));
        posts.truncate(limit);
        Ok(posts)
    }

    /// Starts the profile actor, polls until completion, and returns the
    /// first dataset item.
    async fn run_profile_actor(&self, username: &str) -> Result<RawProfile, ProfileError> {
        let url = format!("{}/v2/acts/{PROFILE_ACTOR}/runs", self.base_url);
        let payload = serde_json::json!({
            "username": username,
            "includeEmail": false,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let envelope: RunEnvelope =
            serde_json::from_str(&body).map_err(|source| ProfileError::Deserialize {
                context: format!("run start for {username}"),
                source,
            })?;

        self.await_run(&envelope.data.id).await?;
        self.fetch_first_dataset_item(&envelope.data.default_dataset_id)
            .await
    }

    /// Polls the run-status endpoint until the run succeeds, fails, or the
    /// overall deadline passes.
    async fn await_run(&self, run_id: &str) -> Result<(), ProfileError> {
        let started = tokio::time::Instant::now();
        loop {
            let status = self.run_status(run_id).await?;
            match status.as_str() {
                "SUCCEEDED" => return Ok(()),
                "FAILED" | "ABORTED" | "TIMED-OUT" | "TIMED_OUT" => {
                    return Err(ProfileError::RunFailed { status });
                }
                other => {
                    tracing::debug!(run_id, status = other, "actor run still in progress");
                }
            }
            if started.elapsed() >= self.run_timeout {
                return Err(ProfileError::RunTimeout {
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn run_status(&self, run_id: &str) -> Result<String, ProfileError> {
        let encoded = utf8_percent_encode(run_id, NON_ALPHANUMERIC);
        let url = format!("{}/v2/actor-runs/{encoded}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.text().await?;
        let envelope: RunEnvelope =
            serde_json::from_str(&body).map_err(|source| ProfileError::Deserialize {
                context: format!("run status for {run_id}"),
                source,
            })?;
        Ok(envelope.data.status)
    }

    async fn fetch_first_dataset_item(&self, dataset_id: &str) -> Result<RawProfile, ProfileError> {
        let encoded = utf8_percent_encode(dataset_id, NON_ALPHANUMERIC);
        let url = format!("{}/v2/datasets/{encoded}/items", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.text().await?;
        let mut items: Vec<RawProfile> =
            serde_json::from_str(&body).map_err(|source| ProfileError::Deserialize {
                context: format!("dataset {dataset_id} items"),
                source,
            })?;
        if items.is_empty() {
            return Err(ProfileError::EmptyDataset {
                dataset_id: dataset_id.to_owned(),
            });
        }
        Ok(items.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_username_basic_forms() {
        assert_eq!(
            extract_username("https://www.linkedin.com/in/jordan-example/"),
            Some("jordan-example".to_owned())
        );
        assert_eq!(
            extract_username("https://linkedin.com/in/jordan?trk=feed"),
            Some("jordan".to_owned())
        );
        assert_eq!(
            extract_username("  linkedin.com/in/jordan  "),
            Some("jordan".to_owned())
        );
    }

    #[test]
    fn extract_username_rejects_non_profile_urls() {
        assert_eq!(extract_username("https://example.com/in/jordan"), None);
        assert_eq!(extract_username("https://linkedin.com/company/acme"), None);
        assert_eq!(extract_username("https://linkedin.com/in/"), None);
        assert_eq!(extract_username(""), None);
    }

    fn post(ms: i64) -> PostRecord {
        PostRecord {
            posted_at_ms: ms,
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn activity_days_uses_newest_post() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let day_ms = 86_400_000;
        let posts = vec![
            post(1_700_000_000_000 - 10 * day_ms),
            post(1_700_000_000_000 - 3 * day_ms),
        ];
        assert_eq!(activity_days_from_posts(&posts, now), Some(3));
    }

    #[test]
    fn activity_days_floors_future_posts_at_zero() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let posts = vec![post(1_700_000_000_000 + 86_400_000)];
        assert_eq!(activity_days_from_posts(&posts, now), Some(0));
    }

    #[test]
    fn activity_days_none_without_posts() {
        let now = Utc::now();
        assert_eq!(activity_days_from_posts(&[], now), None);
    }
}
