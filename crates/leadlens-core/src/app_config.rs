use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Serialized classifier artifact, loaded once at startup.
    pub model_path: PathBuf,
    /// Feature-schema manifest persisted alongside the model.
    pub manifest_path: PathBuf,
    /// Bearer token for the actor platform. `None` disables extraction;
    /// scoring from manual fields alone still works.
    pub apify_api_token: Option<String>,
    pub profile_request_timeout_secs: u64,
    /// Overall deadline for one start-job/poll/fetch cycle.
    pub profile_run_timeout_secs: u64,
    pub profile_poll_interval_secs: u64,
    pub posts_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("model_path", &self.model_path)
            .field("manifest_path", &self.manifest_path)
            .field(
                "apify_api_token",
                &self.apify_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "profile_request_timeout_secs",
                &self.profile_request_timeout_secs,
            )
            .field("profile_run_timeout_secs", &self.profile_run_timeout_secs)
            .field(
                "profile_poll_interval_secs",
                &self.profile_poll_interval_secs,
            )
            .field("posts_limit", &self.posts_limit)
            .finish()
    }
}
