//! Competitive Advantage Index: z-score of a brand's composite against the
//! population of tracked competitors in the same run.

use std::collections::BTreeMap;

use crate::types::{CaiClassification, CaiResult, CompetitiveScore};

/// Below this the population standard deviation is treated as zero; guards
/// the division against accumulated floating-point noise on identical
/// composites.
const STD_DEV_FLOOR: f64 = 1e-9;

/// Compute mean, population standard deviation (divisor N, not N−1), and
/// per-brand CAI over the exact composite set of this run.
///
/// When the standard deviation is zero (all composites identical, including
/// the single-brand case) every CAI is 0 and classifies as market average —
/// a defined behavior, never a division error.
#[must_use]
pub fn compute_cai(scores: &BTreeMap<String, CompetitiveScore>) -> BTreeMap<String, CaiResult> {
    let n = scores.len();
    if n == 0 {
        return BTreeMap::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f64;
    let mean = scores.values().map(|s| s.composite).sum::<f64>() / n_f;
    let variance = scores
        .values()
        .map(|s| (s.composite - mean).powi(2))
        .sum::<f64>()
        / n_f;
    let std_dev = variance.sqrt();

    scores
        .iter()
        .map(|(name, score)| {
            let value = if std_dev < STD_DEV_FLOOR {
                0.0
            } else {
                (score.composite - mean) / std_dev
            };
            (
                name.clone(),
                CaiResult {
                    brand_score: score.composite,
                    market_average: mean,
                    market_std_dev: std_dev,
                    value,
                    classification: classify_cai(value),
                },
            )
        })
        .collect()
}

/// Threshold classification of a CAI value.
///
/// `> 1.0` strong advantage; `(0.3, 1.0]` moderate advantage;
/// `[−0.3, 0.3]` market average; `[−1.0, −0.3)` moderate disadvantage;
/// `< −1.0` strong disadvantage.
#[must_use]
pub fn classify_cai(value: f64) -> CaiClassification {
    if value > 1.0 {
        CaiClassification::StrongAdvantage
    } else if value > 0.3 {
        CaiClassification::ModerateAdvantage
    } else if value >= -0.3 {
        CaiClassification::MarketAverage
    } else if value >= -1.0 {
        CaiClassification::ModerateDisadvantage
    } else {
        CaiClassification::StrongDisadvantage
    }
}

#[cfg(test)]
mod tests {
    use crate::types::SubScores;

    use super::*;

    fn scores(entries: &[(&str, f64)]) -> BTreeMap<String, CompetitiveScore> {
        entries
            .iter()
            .map(|(name, composite)| {
                (
                    (*name).to_string(),
                    CompetitiveScore {
                        sub_scores: SubScores {
                            market_presence: 0.0,
                            engagement_quality: 0.0,
                            competitive_position: 0.0,
                            market_dynamics: 0.0,
                        },
                        composite: *composite,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify_cai(1.01), CaiClassification::StrongAdvantage);
        assert_eq!(classify_cai(1.0), CaiClassification::ModerateAdvantage);
        assert_eq!(classify_cai(0.31), CaiClassification::ModerateAdvantage);
        assert_eq!(classify_cai(0.3), CaiClassification::MarketAverage);
        assert_eq!(classify_cai(0.0), CaiClassification::MarketAverage);
        assert_eq!(classify_cai(-0.3), CaiClassification::MarketAverage);
        assert_eq!(classify_cai(-0.31), CaiClassification::ModerateDisadvantage);
        assert_eq!(classify_cai(-1.0), CaiClassification::ModerateDisadvantage);
        assert_eq!(classify_cai(-1.01), CaiClassification::StrongDisadvantage);
    }

    #[test]
    fn cai_sign_matches_score_minus_mean() {
        let cai = compute_cai(&scores(&[("A", 80.0), ("B", 60.0), ("C", 40.0)]));
        assert!(cai["A"].value > 0.0);
        assert!(cai["B"].value.abs() < 1e-9);
        assert!(cai["C"].value < 0.0);
    }

    #[test]
    fn uses_population_std_dev() {
        // Two brands at 95 and 41.666…: std-dev (divisor N) equals the
        // half-spread, so both CAIs land at exactly ±1.
        let cai = compute_cai(&scores(&[("A", 95.0), ("B", 125.0 / 3.0)]));
        assert!((cai["A"].value - 1.0).abs() < 1e-9, "got {}", cai["A"].value);
        assert!((cai["B"].value + 1.0).abs() < 1e-9, "got {}", cai["B"].value);
        assert!((cai["A"].market_average - (95.0 + 125.0 / 3.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_std_dev_gives_zero_cai_and_market_average() {
        let cai = compute_cai(&scores(&[("A", 55.0), ("B", 55.0), ("C", 55.0)]));
        for result in cai.values() {
            assert!(result.value.abs() < f64::EPSILON);
            assert_eq!(result.classification, CaiClassification::MarketAverage);
        }
    }

    #[test]
    fn single_brand_is_market_average() {
        let cai = compute_cai(&scores(&[("Solo", 70.0)]));
        assert!(cai["Solo"].value.abs() < f64::EPSILON);
        assert_eq!(cai["Solo"].classification, CaiClassification::MarketAverage);
        assert!(cai["Solo"].market_std_dev.abs() < 1e-9);
    }

    #[test]
    fn empty_score_set_yields_empty_result() {
        assert!(compute_cai(&scores(&[])).is_empty());
    }
}
