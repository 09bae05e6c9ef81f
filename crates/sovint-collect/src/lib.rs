//! Mention collection for sovint.
//!
//! One collector per external platform, each speaking a public JSON API via
//! `reqwest` with an explicit retry policy. The orchestrator runs all
//! requested collectors concurrently under per-platform timeouts and an
//! overall deadline, and delivers whatever settled as a single batch —
//! per-platform failures degrade the run, they never abort it.

pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod search;
pub mod types;
pub mod youtube;

use futures::future::BoxFuture;
use sovint_core::{MentionRecord, Platform};

pub use error::CollectError;
pub use orchestrator::collect_all;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use search::GoogleSearchCollector;
pub use types::{CollectionOutcome, PlatformFailure};
pub use youtube::YouTubeCollector;

/// A per-platform mention collector.
///
/// Implementations own their HTTP client and credentials; failures are
/// per-platform and surface as [`CollectError`], never a panic or abort.
pub trait Collector: Send + Sync {
    fn platform(&self) -> Platform;

    /// Collect mention records for `query` from this platform.
    fn collect<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<MentionRecord>, CollectError>>;
}
