//! Multi-factor competitive scoring.
//!
//! Four independently normalized sub-scores are clamped to [0, 100] and
//! combined with fixed weights (0.40 presence, 0.30 engagement quality,
//! 0.20 position, 0.10 dynamics) into one composite per brand.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::{BrandAggregate, CompetitiveScore, Factor, SovMetrics, SubScores};

/// Neutral sub-score used when a factor cannot be computed from the data
/// (single-brand percentiles, single time bucket for dynamics).
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Compute the four sub-scores and the weighted composite for every brand.
///
/// The `aggregates` and `sov` maps must cover the same brand set; the
/// aggregator guarantees this by emitting an entry per registry brand.
#[must_use]
pub fn compute_scores(
    aggregates: &BTreeMap<String, BrandAggregate>,
    sov: &BTreeMap<String, SovMetrics>,
) -> BTreeMap<String, CompetitiveScore> {
    let presence = market_presence_scores(sov);
    let quality = engagement_quality_scores(aggregates);
    let position = competitive_position_scores(sov);
    let dynamics = market_dynamics_scores(aggregates);

    aggregates
        .keys()
        .map(|name| {
            let sub_scores = SubScores {
                market_presence: clamp(presence.get(name).copied().unwrap_or(0.0)),
                engagement_quality: clamp(quality.get(name).copied().unwrap_or(0.0)),
                competitive_position: clamp(position.get(name).copied().unwrap_or(0.0)),
                market_dynamics: clamp(dynamics.get(name).copied().unwrap_or(NEUTRAL_SCORE)),
            };
            let composite = Factor::ALL
                .iter()
                .map(|f| f.weight() * sub_scores.get(*f))
                .sum();
            (name.clone(), CompetitiveScore { sub_scores, composite })
        })
        .collect()
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// SoV rescaled against the maximum SoV observed in this run (min–max
/// normalization anchored at 0). The top brand only reaches 100 relative to
/// itself, not in absolute share terms.
fn market_presence_scores(sov: &BTreeMap<String, SovMetrics>) -> BTreeMap<String, f64> {
    let max_sov = sov.values().map(|m| m.sov).fold(0.0_f64, f64::max);

    sov.iter()
        .map(|(name, metrics)| {
            let score = if max_sov > 0.0 {
                metrics.sov / max_sov * 100.0
            } else {
                0.0
            };
            (name.clone(), score)
        })
        .collect()
}

/// Per-brand average engagement (engagement sum / mention count)
/// normalized by percentile rank against all tracked brands.
fn engagement_quality_scores(
    aggregates: &BTreeMap<String, BrandAggregate>,
) -> BTreeMap<String, f64> {
    let averages: BTreeMap<String, f64> = aggregates
        .iter()
        .map(|(name, agg)| {
            let avg = if agg.mentions > 0 {
                #[allow(clippy::cast_precision_loss)]
                let count = agg.mentions as f64;
                agg.engagement_sum / count
            } else {
                0.0
            };
            (name.clone(), avg)
        })
        .collect();

    averages
        .keys()
        .map(|name| (name.clone(), percentile_rank(&averages, name)))
        .collect()
}

/// Rank-derived position score: `100 × (N − rank + 1) / N`, so rank 1 maps
/// to 100 and rank N to 100/N.
fn competitive_position_scores(sov: &BTreeMap<String, SovMetrics>) -> BTreeMap<String, f64> {
    let n = sov.len();
    if n == 0 {
        return BTreeMap::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f64;

    sov.iter()
        .map(|(name, metrics)| {
            #[allow(clippy::cast_precision_loss)]
            let rank_f = metrics.rank as f64;
            (name.clone(), 100.0 * (n_f - rank_f + 1.0) / n_f)
        })
        .collect()
}

/// Change in mention volume between the two halves of the observed period,
/// normalized by percentile rank across brands.
///
/// The observed period is split at the midpoint between the earliest and
/// latest `published_at` in the batch; a mention lands in the recent bucket
/// when strictly after the midpoint. With fewer than two time buckets
/// (empty batch, or all timestamps equal) every brand scores the neutral 50.
fn market_dynamics_scores(aggregates: &BTreeMap<String, BrandAggregate>) -> BTreeMap<String, f64> {
    let all_timestamps: Vec<DateTime<Utc>> = aggregates
        .values()
        .flat_map(|agg| agg.timestamps.iter().copied())
        .collect();

    let (Some(min), Some(max)) = (
        all_timestamps.iter().min().copied(),
        all_timestamps.iter().max().copied(),
    ) else {
        return neutral_scores(aggregates);
    };

    if min == max {
        return neutral_scores(aggregates);
    }

    let midpoint = min + (max - min) / 2;

    let deltas: BTreeMap<String, f64> = aggregates
        .iter()
        .map(|(name, agg)| {
            let recent = agg.timestamps.iter().filter(|ts| **ts > midpoint).count();
            let earlier = agg.timestamps.len() - recent;
            #[allow(clippy::cast_precision_loss)]
            let delta = recent as f64 - earlier as f64;
            (name.clone(), delta)
        })
        .collect();

    deltas
        .keys()
        .map(|name| (name.clone(), percentile_rank(&deltas, name)))
        .collect()
}

fn neutral_scores(aggregates: &BTreeMap<String, BrandAggregate>) -> BTreeMap<String, f64> {
    aggregates
        .keys()
        .map(|name| (name.clone(), NEUTRAL_SCORE))
        .collect()
}

/// Percentile rank of `brand`'s value within the population, in [0, 100].
///
/// `(strictly_below + 0.5 × ties_excluding_self) / (N − 1) × 100`. A
/// single-brand population has no peers to rank against and yields the
/// neutral 50; an all-tied population yields 50 for everyone.
fn percentile_rank(values: &BTreeMap<String, f64>, brand: &str) -> f64 {
    let n = values.len();
    if n <= 1 {
        return NEUTRAL_SCORE;
    }
    let Some(v) = values.get(brand).copied() else {
        return NEUTRAL_SCORE;
    };

    let mut below = 0usize;
    let mut ties = 0usize;
    for (name, other) in values {
        if name == brand {
            continue;
        }
        if *other < v {
            below += 1;
        } else if (*other - v).abs() < f64::EPSILON {
            ties += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let rank = (below as f64 + 0.5 * ties as f64) / (n as f64 - 1.0);
    rank * 100.0
}
