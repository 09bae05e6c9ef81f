//! Competitive-intelligence analysis pipeline for sovint.
//!
//! Turns a batch of brand mentions into a scored report: share-of-voice,
//! a four-factor composite score, a competitive advantage index (z-score
//! against the tracked competitor population), a BCG-style market position,
//! and ranked rule-based insights. All stages are pure, synchronous, and
//! deterministic; the coordinator threads them over an immutable
//! accumulating context.

pub mod aggregate;
pub mod cai;
pub mod error;
pub mod insight;
pub mod pipeline;
pub mod position;
pub mod score;
pub mod sov;
pub mod types;

pub use aggregate::aggregate_mentions;
pub use cai::{classify_cai, compute_cai};
pub use error::{AnalysisError, StageFailure};
pub use insight::generate_insights;
pub use pipeline::run_analysis;
pub use position::{classify_positions, quadrant};
pub use score::compute_scores;
pub use sov::compute_sov;
pub use types::{
    AnalysisContext, BrandAggregate, BrandReport, CaiClassification, CaiResult, CompetitiveScore,
    Factor, Insight, InsightCategory, Quadrant, Report, SovMetrics, SubScores,
};
