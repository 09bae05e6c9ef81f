//! Concurrent collection across platforms with deadline-based settlement.

use std::collections::BTreeSet;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::CollectError;
use crate::types::{CollectionOutcome, PlatformFailure};
use crate::Collector;

/// Run every collector concurrently and deliver the combined batch.
///
/// Each collector gets its own `per_platform_timeout`; the whole round is
/// bounded by `deadline`. Collection settles when every platform has
/// succeeded, failed, or timed out — or when the deadline elapses,
/// whichever comes first. Platforms still pending at the deadline are
/// recorded as failures and the outcome is flagged incomplete; the caller
/// proceeds with whatever batch exists.
pub async fn collect_all(
    collectors: &[Box<dyn Collector>],
    query: &str,
    per_platform_timeout: Duration,
    deadline: Duration,
) -> CollectionOutcome {
    let mut pending: BTreeSet<String> = collectors
        .iter()
        .map(|c| c.platform().to_string())
        .collect();

    let mut futures: FuturesUnordered<_> = collectors
        .iter()
        .map(|collector| {
            let platform = collector.platform().to_string();
            async move {
                let result =
                    tokio::time::timeout(per_platform_timeout, collector.collect(query)).await;
                (platform, result)
            }
        })
        .collect();

    let mut outcome = CollectionOutcome::default();
    let deadline_sleep = tokio::time::sleep(deadline);
    tokio::pin!(deadline_sleep);

    loop {
        tokio::select! {
            () = &mut deadline_sleep => {
                tracing::warn!(
                    pending = ?pending,
                    "overall deadline elapsed before all platforms settled"
                );
                outcome.incomplete = true;
                for platform in &pending {
                    outcome.failures.push(PlatformFailure {
                        platform: platform.clone(),
                        reason: "overall deadline elapsed".to_string(),
                    });
                }
                break;
            }
            settled = futures.next() => {
                let Some((platform, result)) = settled else {
                    break;
                };
                pending.remove(&platform);
                match result {
                    Ok(Ok(mut records)) => {
                        tracing::info!(
                            platform = %platform,
                            count = records.len(),
                            "platform collection complete"
                        );
                        outcome.records.append(&mut records);
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(platform = %platform, error = %err, "platform collection failed");
                        outcome.failures.push(PlatformFailure {
                            platform,
                            reason: err.to_string(),
                        });
                    }
                    Err(_elapsed) => {
                        let err = CollectError::Timeout {
                            platform: platform.clone(),
                            timeout_secs: per_platform_timeout.as_secs(),
                        };
                        tracing::warn!(platform = %platform, error = %err, "platform collection timed out");
                        outcome.failures.push(PlatformFailure {
                            platform,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    outcome
}
