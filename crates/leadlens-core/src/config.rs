use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("LEADLENS_ENV", "development"));
    let bind_addr = parse_addr("LEADLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LEADLENS_LOG_LEVEL", "info");

    let model_path = PathBuf::from(or_default("LEADLENS_MODEL_PATH", "./models/model.json"));
    let manifest_path = PathBuf::from(or_default(
        "LEADLENS_MANIFEST_PATH",
        "./models/metadata.json",
    ));

    let apify_api_token = lookup("APIFY_API_TOKEN").ok().filter(|t| !t.is_empty());

    let profile_request_timeout_secs = parse_u64("LEADLENS_PROFILE_REQUEST_TIMEOUT_SECS", "30")?;
    let profile_run_timeout_secs = parse_u64("LEADLENS_PROFILE_RUN_TIMEOUT_SECS", "180")?;
    let profile_poll_interval_secs = parse_u64("LEADLENS_PROFILE_POLL_INTERVAL_SECS", "4")?;
    let posts_limit = parse_usize("LEADLENS_POSTS_LIMIT", "2")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        model_path,
        manifest_path,
        apify_api_token,
        profile_request_timeout_secs,
        profile_run_timeout_secs,
        profile_poll_interval_secs,
        posts_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
