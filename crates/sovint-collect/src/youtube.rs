//! Video-platform collector backed by the `YouTube` Data API v3.
//!
//! Two calls per collection round: `search` for matching videos, then
//! `videos` for their statistics (views, likes, comments). Statistics drive
//! the engagement metrics on each mention record.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::Deserialize;
use sovint_core::{MentionRecord, Platform};

use crate::error::CollectError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::Collector;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Collector for the video platform.
///
/// Use [`YouTubeCollector::new`] for production or
/// [`YouTubeCollector::with_base_url`] to point at a mock server in tests.
pub struct YouTubeCollector {
    client: Client,
    api_key: String,
    base_url: Url,
    max_results: usize,
    retry: RetryPolicy,
}

impl YouTubeCollector {
    /// Creates a collector pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_results: usize,
        retry: RetryPolicy,
    ) -> Result<Self, CollectError> {
        Self::with_base_url(api_key, timeout_secs, max_results, retry, DEFAULT_BASE_URL)
    }

    /// Creates a collector with a custom base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built or
    /// [`CollectError::Api`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
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

        // The base must end with exactly one slash so join() appends the
        // endpoint instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CollectError::Api {
            platform: Platform::Video.to_string(),
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_results,
            retry,
        })
    }

    async fn fetch(&self, query: &str) -> Result<Vec<MentionRecord>, CollectError> {
        let max = self.max_results.to_string();
        let search_url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max.as_str()),
                ("q", query),
                ("key", self.api_key.as_str()),
            ],
        )?;
        let search: SearchResponse = self.get_json(search_url, "search").await?;

        let videos: Vec<(String, Snippet)> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
            .collect();

        if videos.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = videos.iter().map(|(id, _)| id.as_str()).collect();
        let ids_joined = ids.join(",");
        let stats_url = self.endpoint(
            "videos",
            &[
                ("part", "statistics"),
                ("id", ids_joined.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )?;
        let stats: VideosResponse = self.get_json(stats_url, "videos").await?;

        let stats_by_id: BTreeMap<String, Statistics> = stats
            .items
            .into_iter()
            .map(|item| (item.id, item.statistics))
            .collect();

        Ok(videos
            .into_iter()
            .map(|(id, snippet)| {
                let mut engagement = BTreeMap::new();
                if let Some(s) = stats_by_id.get(&id) {
                    engagement.insert("views".to_string(), parse_count(s.view_count.as_deref()));
                    engagement.insert("likes".to_string(), parse_count(s.like_count.as_deref()));
                    engagement
                        .insert("comments".to_string(), parse_count(s.comment_count.as_deref()));
                }
                MentionRecord {
                    platform: Platform::Video,
                    source_id: id,
                    title: snippet.title,
                    published_at: snippet.published_at,
                    engagement,
                }
            })
            .collect())
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, CollectError> {
        let mut url = self.base_url.join(path).map_err(|e| CollectError::Api {
            platform: Platform::Video.to_string(),
            message: format!("invalid endpoint '{path}': {e}"),
        })?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, CollectError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(CollectError::RateLimited {
                platform: Platform::Video.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CollectError::Api {
                platform: Platform::Video.to_string(),
                message: format!("unexpected HTTP status {status} from {context}"),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CollectError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

impl Collector for YouTubeCollector {
    fn platform(&self) -> Platform {
        Platform::Video
    }

    fn collect<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<MentionRecord>, CollectError>> {
        Box::pin(async move { retry_with_backoff(self.retry, || self.fetch(query)).await })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Statistics,
}

/// The API returns counts as strings; missing metrics count as zero.
#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

fn parse_count(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0)
}
