mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use leadlens_model::Predictor;
use leadlens_profile::ProfileClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(leadlens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let predictor = Arc::new(Predictor::load(&config.model_path, &config.manifest_path)?);

    let profile_client = match config.apify_api_token.as_deref() {
        Some(token) => Some(Arc::new(ProfileClient::new(
            token,
            config.profile_request_timeout_secs,
            config.profile_run_timeout_secs,
            config.profile_poll_interval_secs,
        )?)),
        None => {
            tracing::warn!(
                "APIFY_API_TOKEN not set; profile extraction disabled, scoring from manual fields only"
            );
            None
        }
    };

    let app = build_app(AppState::new(
        predictor,
        profile_client,
        config.posts_limit,
    ));

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
