use std::path::PathBuf;

/// Application configuration resolved from the environment.
///
/// Collector credentials are optional: a platform without credentials is
/// simply not collectible and the run degrades if it was requested.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub brands_path: PathBuf,
    pub youtube_api_key: Option<String>,
    pub google_cse_key: Option<String>,
    pub google_cse_cx: Option<String>,
    /// Per-platform collection timeout, seconds.
    pub collect_timeout_secs: u64,
    /// Overall analysis deadline, seconds.
    pub deadline_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub jitter_ms: u64,
    /// Maximum results requested per platform.
    pub max_results: usize,
}
