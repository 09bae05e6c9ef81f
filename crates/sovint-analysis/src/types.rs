use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sovint_core::{BrandProfile, MentionRecord, Platform};

/// Per-brand aggregate produced by the mention aggregator.
#[derive(Debug, Clone, Default)]
pub struct BrandAggregate {
    /// Deduplicated mention count across all platforms.
    pub mentions: usize,
    /// Mention counts broken down by platform.
    pub platform_counts: BTreeMap<Platform, usize>,
    /// Sum of all engagement metrics over this brand's mentions.
    pub engagement_sum: f64,
    /// Publication timestamps of the retained mentions (for dynamics).
    pub timestamps: Vec<DateTime<Utc>>,
}

/// Share-of-voice percentage and deterministic rank for one brand.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SovMetrics {
    /// Mention share in percent, 0 when the batch is empty.
    pub sov: f64,
    /// 1-based rank by descending SoV; all 1 when the batch is empty.
    pub rank: usize,
}

/// The four scoring factors and their fixed composite weights.
///
/// The weights are product semantics, not configuration — changing them is
/// a versioned decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    MarketPresence,
    EngagementQuality,
    CompetitivePosition,
    MarketDynamics,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::MarketPresence,
        Factor::EngagementQuality,
        Factor::CompetitivePosition,
        Factor::MarketDynamics,
    ];

    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Factor::MarketPresence => 0.40,
            Factor::EngagementQuality => 0.30,
            Factor::CompetitivePosition => 0.20,
            Factor::MarketDynamics => 0.10,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Factor::MarketPresence => "market presence",
            Factor::EngagementQuality => "engagement quality",
            Factor::CompetitivePosition => "competitive position",
            Factor::MarketDynamics => "market dynamics",
        }
    }
}

/// The four sub-scores, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub market_presence: f64,
    pub engagement_quality: f64,
    pub competitive_position: f64,
    pub market_dynamics: f64,
}

impl SubScores {
    #[must_use]
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::MarketPresence => self.market_presence,
            Factor::EngagementQuality => self.engagement_quality,
            Factor::CompetitivePosition => self.competitive_position,
            Factor::MarketDynamics => self.market_dynamics,
        }
    }
}

/// Per-brand multi-factor score. Created once per run, never mutated.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveScore {
    #[serde(flatten)]
    pub sub_scores: SubScores,
    /// Fixed weighted sum of the sub-scores, in [0, 100].
    pub composite: f64,
}

/// Classification of a brand's competitive advantage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaiClassification {
    StrongAdvantage,
    ModerateAdvantage,
    MarketAverage,
    ModerateDisadvantage,
    StrongDisadvantage,
}

/// Competitive advantage index: z-score of a brand's composite against the
/// population of tracked competitors in the same run.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaiResult {
    pub brand_score: f64,
    pub market_average: f64,
    pub market_std_dev: f64,
    pub value: f64,
    pub classification: CaiClassification,
}

/// BCG-style market position quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quadrant {
    Star,
    CashCow,
    QuestionMark,
    Dog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Opportunity,
    Strength,
}

/// A ranked rule-based finding about one factor of one brand.
///
/// `priority` orders insights within a brand and is not meant for display.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub factor: Factor,
    pub text: String,
    pub priority: f64,
}

/// Accumulating context threaded through the pipeline stages.
///
/// Only the coordinator extends it; each stage receives the prior context
/// and returns an extended copy. Stage outputs are `Option` so a skipped
/// stage leaves a visible hole instead of a fabricated value.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub query: String,
    pub brands: Vec<BrandProfile>,
    pub mentions: Vec<MentionRecord>,
    /// True when not all requested platforms reported before the deadline.
    pub collection_incomplete: bool,
    /// Platforms that failed or timed out during collection.
    pub degraded_platforms: Vec<String>,
    /// True once any recoverable failure has been absorbed.
    pub degraded: bool,
    /// Names of stages skipped after a recoverable failure.
    pub skipped_stages: Vec<String>,
    pub integrity_dropped: usize,
    pub unmatched: usize,
    pub aggregates: Option<BTreeMap<String, BrandAggregate>>,
    pub sov: Option<BTreeMap<String, SovMetrics>>,
    pub scores: Option<BTreeMap<String, CompetitiveScore>>,
    pub cai: Option<BTreeMap<String, CaiResult>>,
    pub positions: Option<BTreeMap<String, Quadrant>>,
    pub insights: Option<BTreeMap<String, Vec<Insight>>>,
}

impl AnalysisContext {
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        brands: Vec<BrandProfile>,
        mentions: Vec<MentionRecord>,
    ) -> Self {
        Self {
            query: query.into(),
            brands,
            mentions,
            collection_incomplete: false,
            degraded_platforms: Vec::new(),
            degraded: false,
            skipped_stages: Vec::new(),
            integrity_dropped: 0,
            unmatched: 0,
            aggregates: None,
            sov: None,
            scores: None,
            cai: None,
            positions: None,
            insights: None,
        }
    }

    /// Record the outcome of the collection layer on a fresh context.
    #[must_use]
    pub fn with_collection_status(
        mut self,
        incomplete: bool,
        degraded_platforms: Vec<String>,
    ) -> Self {
        self.collection_incomplete = incomplete;
        self.degraded = self.degraded || incomplete || !degraded_platforms.is_empty();
        self.degraded_platforms = degraded_platforms;
        self
    }
}

/// Value and classification of a brand's CAI as it appears in the report.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaiSummary {
    pub value: f64,
    pub classification: CaiClassification,
}

/// One brand's row in the final report, ordered by rank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandReport {
    pub brand: String,
    pub sov: f64,
    pub rank: usize,
    pub mentions: usize,
    pub composite_score: f64,
    pub sub_scores: SubScores,
    pub cai: CaiSummary,
    pub market_position: Quadrant,
    pub insights: Vec<Insight>,
}

/// The final competitive-intelligence report for one analysis run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub run_id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub brands: Vec<BrandReport>,
    pub collection_incomplete: bool,
    pub degraded: bool,
    pub degraded_platforms: Vec<String>,
    pub skipped_stages: Vec<String>,
    pub unmatched_mentions: usize,
    pub integrity_dropped: usize,
}
