use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use leadlens_core::{AppConfig, ManualCompanyFields, ProfileRecord};
use leadlens_features::derive;
use leadlens_model::Predictor;
use leadlens_profile::ProfileClient;

#[derive(Debug, Parser)]
#[command(name = "leadlens-cli")]
#[command(about = "LeadLens lead scoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a lead and print the full prediction with explanations.
    Score {
        #[command(flatten)]
        lead: LeadArgs,
        /// How many top contributing features to include.
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Derive and print the feature vector and debug trace without predicting.
    Features {
        #[command(flatten)]
        lead: LeadArgs,
    },
}

#[derive(Debug, Args)]
struct LeadArgs {
    /// Profile URL to extract; omit to score from manual fields only.
    #[arg(long)]
    url: Option<String>,
    #[arg(long, default_value = "")]
    company: String,
    /// Company size text, e.g. "201-500 employees".
    #[arg(long, default_value = "")]
    size: String,
    /// Annual revenue text, e.g. "$261.9 Million".
    #[arg(long, default_value = "")]
    revenue: String,
    #[arg(long, default_value = "")]
    industry: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = leadlens_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_level.clone()))?,
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score { lead, top } => run_score(&config, lead, top).await,
        Commands::Features { lead } => run_features(&config, lead).await,
    }
}

async fn run_score(config: &AppConfig, lead: LeadArgs, top: usize) -> anyhow::Result<()> {
    let predictor = Predictor::load(&config.model_path, &config.manifest_path)?;
    let (profile, manual) = resolve_lead(config, lead).await?;
    let (features, trace) = derive(profile.as_ref(), &manual);
    let prediction = predictor.score(&features, top)?;

    let output = serde_json::json!({
        "prediction": prediction,
        "debug_trace": trace,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_features(config: &AppConfig, lead: LeadArgs) -> anyhow::Result<()> {
    let (profile, manual) = resolve_lead(config, lead).await?;
    let (features, trace) = derive(profile.as_ref(), &manual);

    let feature_map: serde_json::Map<String, serde_json::Value> = features
        .entries()
        .map(|(name, value)| (name.to_owned(), serde_json::json!(value)))
        .collect();
    let output = serde_json::json!({
        "features": feature_map,
        "debug_trace": trace,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Optionally extracts a profile, then packs the manual fields.
///
/// An extraction failure is fatal here, unlike the server boundary: a CLI
/// invocation that names a URL wants that profile scored.
async fn resolve_lead(
    config: &AppConfig,
    lead: LeadArgs,
) -> anyhow::Result<(Option<ProfileRecord>, ManualCompanyFields)> {
    let profile = match lead.url.as_deref() {
        Some(url) => {
            let token = config.apify_api_token.as_deref().ok_or_else(|| {
                anyhow::anyhow!("APIFY_API_TOKEN is required when --url is given")
            })?;
            let client = ProfileClient::new(
                token,
                config.profile_request_timeout_secs,
                config.profile_run_timeout_secs,
                config.profile_poll_interval_secs,
            )?;
            tracing::info!(url, "extracting profile");
            Some(client.extract(url, config.posts_limit, Utc::now()).await?)
        }
        None => None,
    };

    let manual = ManualCompanyFields {
        company_name: lead.company,
        company_size: lead.size,
        annual_revenue: lead.revenue,
        industry: lead.industry,
    };
    Ok((profile, manual))
}
