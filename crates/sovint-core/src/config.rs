use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let log_level = or_default("SOVINT_LOG_LEVEL", "info");
    let brands_path = PathBuf::from(or_default("SOVINT_BRANDS_PATH", "./config/brands.yaml"));

    let youtube_api_key = lookup("YOUTUBE_API_KEY").ok();
    let google_cse_key = lookup("GOOGLE_CSE_KEY").ok();
    let google_cse_cx = lookup("GOOGLE_CSE_CX").ok();

    let collect_timeout_secs = parse_u64("SOVINT_COLLECT_TIMEOUT_SECS", "30")?;
    let deadline_secs = parse_u64("SOVINT_DEADLINE_SECS", "120")?;
    let max_retries = parse_u32("SOVINT_MAX_RETRIES", "3")?;
    let backoff_base_ms = parse_u64("SOVINT_BACKOFF_BASE_MS", "500")?;
    let jitter_ms = parse_u64("SOVINT_JITTER_MS", "250")?;
    let max_results = parse_usize("SOVINT_MAX_RESULTS", "25")?;

    Ok(AppConfig {
        log_level,
        brands_path,
        youtube_api_key,
        google_cse_key,
        google_cse_cx,
        collect_timeout_secs,
        deadline_secs,
        max_retries,
        backoff_base_ms,
        jitter_ms,
        max_results,
    })
}
