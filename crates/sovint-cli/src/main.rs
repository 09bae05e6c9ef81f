use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sovint_analysis::{run_analysis, AnalysisContext};
use sovint_collect::{
    collect_all, Collector, GoogleSearchCollector, RetryPolicy, YouTubeCollector,
};
use sovint_core::{load_app_config, load_brands, Platform};

#[derive(Debug, Parser)]
#[command(name = "sovint")]
#[command(about = "Share-of-voice competitive intelligence reports")]
struct Cli {
    /// Query to analyze, e.g. "smart fan".
    query: String,

    /// Platforms to collect from.
    #[arg(long, default_value = "search,video", value_delimiter = ',')]
    platforms: Vec<String>,

    /// Brand registry path; overrides SOVINT_BRANDS_PATH.
    #[arg(long)]
    brands: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();

    let brands_path = cli.brands.unwrap_or_else(|| config.brands_path.clone());
    let registry = load_brands(&brands_path)?;

    let retry = RetryPolicy {
        max_retries: config.max_retries,
        backoff_base_ms: config.backoff_base_ms,
        jitter_ms: config.jitter_ms,
    };

    let mut collectors: Vec<Box<dyn Collector>> = Vec::new();
    let mut unavailable: Vec<String> = Vec::new();

    for platform in &cli.platforms {
        match platform.as_str() {
            "search" => {
                if let (Some(key), Some(cx)) = (&config.google_cse_key, &config.google_cse_cx) {
                    collectors.push(Box::new(GoogleSearchCollector::new(
                        key,
                        cx,
                        config.collect_timeout_secs,
                        config.max_results,
                        retry,
                    )?));
                } else {
                    tracing::warn!(
                        "search platform requested but GOOGLE_CSE_KEY/GOOGLE_CSE_CX are not set"
                    );
                    unavailable.push(Platform::Search.to_string());
                }
            }
            "video" => {
                if let Some(key) = &config.youtube_api_key {
                    collectors.push(Box::new(YouTubeCollector::new(
                        key,
                        config.collect_timeout_secs,
                        config.max_results,
                        retry,
                    )?));
                } else {
                    tracing::warn!("video platform requested but YOUTUBE_API_KEY is not set");
                    unavailable.push(Platform::Video.to_string());
                }
            }
            other => anyhow::bail!("unknown platform '{other}' (expected 'search' or 'video')"),
        }
    }

    let outcome = collect_all(
        &collectors,
        &cli.query,
        Duration::from_secs(config.collect_timeout_secs),
        Duration::from_secs(config.deadline_secs),
    )
    .await;

    let mut degraded = outcome.degraded_platforms();
    degraded.extend(unavailable);
    degraded.sort();
    degraded.dedup();

    let ctx = AnalysisContext::new(cli.query, registry.brands, outcome.records)
        .with_collection_status(outcome.incomplete, degraded);
    let report = run_analysis(ctx)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
