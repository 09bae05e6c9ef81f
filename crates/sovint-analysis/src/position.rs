//! BCG-style market positioning over relative share and performance.

use std::collections::BTreeMap;

use crate::types::{CompetitiveScore, Quadrant, SovMetrics};

/// Threshold on both axes; `≥` is inclusive on the upper side.
const AXIS_SPLIT: f64 = 0.5;

/// Map a (relative share, performance) pair to its quadrant.
///
/// Total over [0, 1] × [0, 1]: every pair lands in exactly one quadrant,
/// boundary values included.
#[must_use]
pub fn quadrant(relative_share: f64, performance: f64) -> Quadrant {
    match (relative_share >= AXIS_SPLIT, performance >= AXIS_SPLIT) {
        (true, true) => Quadrant::Star,
        (true, false) => Quadrant::CashCow,
        (false, true) => Quadrant::QuestionMark,
        (false, false) => Quadrant::Dog,
    }
}

/// Classify every brand's market position.
///
/// Relative share is the brand's SoV divided by the maximum SoV in the run
/// (0 when no brand has any voice); performance is the composite score
/// scaled to [0, 1].
#[must_use]
pub fn classify_positions(
    sov: &BTreeMap<String, SovMetrics>,
    scores: &BTreeMap<String, CompetitiveScore>,
) -> BTreeMap<String, Quadrant> {
    let max_sov = sov.values().map(|m| m.sov).fold(0.0_f64, f64::max);

    scores
        .iter()
        .map(|(name, score)| {
            let share = sov.get(name).map_or(0.0, |m| {
                if max_sov > 0.0 {
                    m.sov / max_sov
                } else {
                    0.0
                }
            });
            (name.clone(), quadrant(share, score.composite / 100.0))
        })
        .collect()
}
