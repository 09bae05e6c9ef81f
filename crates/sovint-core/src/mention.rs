use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External platform a mention was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Search,
    Video,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Search => write!(f, "search"),
            Platform::Video => write!(f, "video"),
        }
    }
}

/// A single brand mention collected from an external platform.
///
/// Immutable once created; only collectors produce these. `source_id` is
/// unique within its platform (video id, result URL) and drives
/// deduplication downstream. The engagement key set is platform-dependent:
/// video mentions carry `views`/`likes`/`comments`, search mentions carry a
/// `position_weight` derived from result rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionRecord {
    pub platform: Platform,
    pub source_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub engagement: BTreeMap<String, f64>,
}

impl MentionRecord {
    /// Sum of all engagement metrics on this mention.
    #[must_use]
    pub fn engagement_total(&self) -> f64 {
        self.engagement.values().sum()
    }
}
