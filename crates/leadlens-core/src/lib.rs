//! Shared domain types and configuration for LeadLens.
//!
//! Holds the profile/company data model consumed by the feature deriver and
//! the env-var-driven application configuration used by the server and CLI.

mod app_config;
mod config;
mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{Experience, ManualCompanyFields, PostRecord, ProfileRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
