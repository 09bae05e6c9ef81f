//! Share-of-voice calculation and deterministic ranking.

use std::collections::BTreeMap;

use crate::types::{BrandAggregate, SovMetrics};

/// Compute each brand's mention share and rank.
///
/// `sov = mentions / total × 100`. An empty batch is a defined case, not an
/// error: every brand gets SoV 0 and rank 1 (an all-way tie). Otherwise
/// ranks are assigned by descending SoV, ties broken by descending
/// engagement sum, then ascending canonical name, so the ordering is fully
/// deterministic.
#[must_use]
pub fn compute_sov(aggregates: &BTreeMap<String, BrandAggregate>) -> BTreeMap<String, SovMetrics> {
    let total: usize = aggregates.values().map(|a| a.mentions).sum();

    if total == 0 {
        return aggregates
            .keys()
            .map(|name| (name.clone(), SovMetrics { sov: 0.0, rank: 1 }))
            .collect();
    }

    #[allow(clippy::cast_precision_loss)]
    let total_f = total as f64;

    let mut ranked: Vec<(&String, f64, f64)> = aggregates
        .iter()
        .map(|(name, agg)| {
            #[allow(clippy::cast_precision_loss)]
            let share = agg.mentions as f64 / total_f * 100.0;
            (name, share, agg.engagement_sum)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.total_cmp(&a.2))
            .then_with(|| a.0.cmp(b.0))
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (name, sov, _))| (name.clone(), SovMetrics { sov, rank: idx + 1 }))
        .collect()
}
