use thiserror::Error;

/// Per-platform collection errors. All recoverable at the run level: a
/// failing platform degrades the analysis, it never aborts it.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{platform} API error: {message}")]
    Api { platform: String, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {platform}")]
    RateLimited { platform: String },

    #[error("{platform} collection timed out after {timeout_secs}s")]
    Timeout { platform: String, timeout_secs: u64 },
}
