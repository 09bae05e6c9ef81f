//! Rule-based insight generation and ranking.
//!
//! Selection and ranking are pure, deterministic logic; any natural-language
//! embellishment happens outside this crate, fed by the `Insight` values and
//! never feeding back into scores.

use std::collections::BTreeMap;

use crate::types::{CompetitiveScore, Factor, Insight, InsightCategory};

/// Sub-scores below this emit an opportunity insight.
pub const NEUTRAL_THRESHOLD: f64 = 60.0;
/// Sub-scores at or above this emit a strength insight.
pub const STRENGTH_THRESHOLD: f64 = 80.0;

/// Derive ranked findings from each brand's sub-score deficits and strengths.
///
/// Per factor: `< 60` emits an opportunity, `≥ 80` a strength, `[60, 80)`
/// nothing. Priority is `weight(factor) × |score − 60|` and orders insights
/// descending; ties break by factor weight descending, then factor name
/// ascending. Identical scores always yield identical, identically ordered
/// insights.
#[must_use]
pub fn generate_insights(
    scores: &BTreeMap<String, CompetitiveScore>,
) -> BTreeMap<String, Vec<Insight>> {
    scores
        .iter()
        .map(|(name, score)| (name.clone(), brand_insights(name, score)))
        .collect()
}

fn brand_insights(brand: &str, score: &CompetitiveScore) -> Vec<Insight> {
    let mut insights: Vec<Insight> = Factor::ALL
        .iter()
        .filter_map(|factor| factor_insight(brand, *factor, score.sub_scores.get(*factor)))
        .collect();

    insights.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then_with(|| b.factor.weight().total_cmp(&a.factor.weight()))
            .then_with(|| a.factor.label().cmp(b.factor.label()))
    });

    insights
}

fn factor_insight(brand: &str, factor: Factor, score: f64) -> Option<Insight> {
    let priority = factor.weight() * (score - NEUTRAL_THRESHOLD).abs();

    if score < NEUTRAL_THRESHOLD {
        Some(Insight {
            category: InsightCategory::Opportunity,
            factor,
            text: format!(
                "Opportunity in {} for {brand}: {score:.1}/100, below the neutral {NEUTRAL_THRESHOLD:.0} benchmark",
                factor.label(),
            ),
            priority,
        })
    } else if score >= STRENGTH_THRESHOLD {
        Some(Insight {
            category: InsightCategory::Strength,
            factor,
            text: format!(
                "Strength in {} for {brand}: {score:.1}/100, at or above the {STRENGTH_THRESHOLD:.0} mark",
                factor.label(),
            ),
            priority,
        })
    } else {
        None
    }
}
