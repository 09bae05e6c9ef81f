//! Search-platform collector backed by the Google Custom Search JSON API.
//!
//! A search hit has no native engagement counters, so each record carries a
//! `position_weight` metric derived from its result rank (position 1 → 10,
//! position 10 → 1): higher placement means more visibility.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::Deserialize;
use sovint_core::{MentionRecord, Platform};

use crate::error::CollectError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::Collector;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API caps a single page at 10 results.
const PAGE_SIZE: usize = 10;

/// Collector for the search platform.
pub struct GoogleSearchCollector {
    client: Client,
    api_key: String,
    cx: String,
    base_url: Url,
    max_results: usize,
    retry: RetryPolicy,
}

impl GoogleSearchCollector {
    /// Creates a collector pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        cx: &str,
        timeout_secs: u64,
        max_results: usize,
        retry: RetryPolicy,
    ) -> Result<Self, CollectError> {
        Self::with_base_url(api_key, cx, timeout_secs, max_results, retry, DEFAULT_BASE_URL)
    }

    /// Creates a collector with a custom base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built or
    /// [`CollectError::Api`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        cx: &str,
        timeout_secs: u64,
        max_results: usize,
        retry: RetryPolicy,
        base_url: &str,
    ) -> Result<Self, CollectError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sovint/0.1 (competitive-intelligence)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| CollectError::Api {
            platform: Platform::Search.to_string(),
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            cx: cx.to_owned(),
            base_url,
            max_results,
            retry,
        })
    }

    async fn fetch(&self, query: &str) -> Result<Vec<MentionRecord>, CollectError> {
        let num = self.max_results.min(PAGE_SIZE).to_string();
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs([
            ("key", self.api_key.as_str()),
            ("cx", self.cx.as_str()),
            ("q", query),
            ("num", num.as_str()),
        ]);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(CollectError::RateLimited {
                platform: Platform::Search.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CollectError::Api {
                platform: Platform::Search.to_string(),
                message: format!("unexpected HTTP status {status}"),
            });
        }

        let body = response.text().await?;
        let parsed: CseResponse =
            serde_json::from_str(&body).map_err(|e| CollectError::Deserialize {
                context: "customsearch".to_string(),
                source: e,
            })?;

        // The API omits a reliable publication date, so search mentions
        // carry collection time and form a single current snapshot.
        let collected_at = Utc::now();

        Ok(parsed
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let position = idx + 1;
                #[allow(clippy::cast_precision_loss)]
                let weight = (11.0 - position as f64).max(0.0);
                let mut engagement = BTreeMap::new();
                engagement.insert("position_weight".to_string(), weight);
                MentionRecord {
                    platform: Platform::Search,
                    source_id: item.link,
                    title: item.title,
                    published_at: collected_at,
                    engagement,
                }
            })
            .collect())
    }
}

impl Collector for GoogleSearchCollector {
    fn platform(&self) -> Platform {
        Platform::Search
    }

    fn collect<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<MentionRecord>, CollectError>> {
        Box::pin(async move { retry_with_backoff(self.retry, || self.fetch(query)).await })
    }
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: String,
    link: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn no_retry() -> RetryPolicy {
        RetryPolicy {
            max_retries: 0,
            backoff_base_ms: 1,
            jitter_ms: 0,
        }
    }

    async fn collector(server: &MockServer) -> GoogleSearchCollector {
        GoogleSearchCollector::with_base_url("key", "cx-id", 5, 10, no_retry(), &server.uri())
            .unwrap()
    }

    #[tokio::test]
    async fn collects_search_mentions_with_position_weights() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "smart fan"))
            .and(query_param("cx", "cx-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "title": "atomberg fan review", "link": "https://example.com/a" },
                    { "title": "best smart fans 2024", "link": "https://example.com/b" }
                ]
            })))
            .mount(&server)
            .await;

        let records = collector(&server).await.collect("smart fan").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform, Platform::Search);
        assert_eq!(records[0].source_id, "https://example.com/a");
        assert!((records[0].engagement["position_weight"] - 10.0).abs() < f64::EPSILON);
        assert!((records[1].engagement["position_weight"] - 9.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_items_field_yields_no_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchInformation": { "totalResults": "0" }
            })))
            .mount(&server)
            .await;

        let records = collector(&server).await.collect("nothing").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_errors_are_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = collector(&server).await.collect("smart fan").await.unwrap_err();
        assert!(matches!(err, CollectError::Api { .. }));
    }
}
