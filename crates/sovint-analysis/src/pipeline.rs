//! Pipeline coordination.
//!
//! Sequences the analysis stages in fixed order over an accumulating
//! context: Aggregate → SoV → Score → CAI → Position → Insight. Each stage
//! is a pure function from the prior context to an extended copy. A
//! recoverable stage failure marks the run degraded and the pipeline
//! continues with whatever data is present; the only fatal error is an
//! empty competitor set, raised before any stage executes. No stage is
//! retried here — retries belong to the collection layer.

use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::aggregate_mentions;
use crate::cai::compute_cai;
use crate::error::{AnalysisError, StageFailure};
use crate::insight::generate_insights;
use crate::position::classify_positions;
use crate::score::compute_scores;
use crate::sov::compute_sov;
use crate::types::{AnalysisContext, BrandReport, CaiSummary, Report};

type Stage = fn(AnalysisContext) -> Result<AnalysisContext, StageFailure>;

const STAGES: [(&str, Stage); 6] = [
    ("aggregate", aggregate_stage),
    ("sov", sov_stage),
    ("score", score_stage),
    ("cai", cai_stage),
    ("position", position_stage),
    ("insight", insight_stage),
];

/// Run the full analysis pipeline and assemble the final report.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyCompetitorSet`] if the context carries no
/// brand profiles. All other failure modes degrade the run instead of
/// aborting it and surface as flags and counts on the report.
pub fn run_analysis(ctx: AnalysisContext) -> Result<Report, AnalysisError> {
    if ctx.brands.is_empty() {
        return Err(AnalysisError::EmptyCompetitorSet);
    }

    tracing::info!(
        query = %ctx.query,
        brands = ctx.brands.len(),
        mentions = ctx.mentions.len(),
        "starting analysis pipeline"
    );

    let mut ctx = ctx;
    for (name, stage) in STAGES {
        match stage(ctx.clone()) {
            Ok(next) => ctx = next,
            Err(failure) => {
                tracing::warn!(
                    stage = failure.stage,
                    reason = %failure.reason,
                    "stage failed; continuing degraded"
                );
                ctx.degraded = true;
                ctx.skipped_stages.push(name.to_string());
            }
        }
    }

    Ok(assemble_report(ctx))
}

fn aggregate_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let aggregation = aggregate_mentions(&ctx.brands, &ctx.mentions);
    ctx.integrity_dropped = aggregation.integrity_dropped;
    ctx.unmatched = aggregation.unmatched;
    ctx.aggregates = Some(aggregation.aggregates);
    Ok(ctx)
}

fn sov_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let aggregates = ctx.aggregates.as_ref().ok_or(StageFailure {
        stage: "sov",
        reason: "no aggregates from the prior stage".to_string(),
    })?;
    ctx.sov = Some(compute_sov(aggregates));
    Ok(ctx)
}

fn score_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let (Some(aggregates), Some(sov)) = (ctx.aggregates.as_ref(), ctx.sov.as_ref()) else {
        return Err(StageFailure {
            stage: "score",
            reason: "missing aggregates or SoV metrics".to_string(),
        });
    };
    ctx.scores = Some(compute_scores(aggregates, sov));
    Ok(ctx)
}

fn cai_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let scores = ctx.scores.as_ref().ok_or(StageFailure {
        stage: "cai",
        reason: "no competitive scores from the prior stage".to_string(),
    })?;
    ctx.cai = Some(compute_cai(scores));
    Ok(ctx)
}

fn position_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let (Some(sov), Some(scores)) = (ctx.sov.as_ref(), ctx.scores.as_ref()) else {
        return Err(StageFailure {
            stage: "position",
            reason: "missing SoV metrics or competitive scores".to_string(),
        });
    };
    ctx.positions = Some(classify_positions(sov, scores));
    Ok(ctx)
}

fn insight_stage(mut ctx: AnalysisContext) -> Result<AnalysisContext, StageFailure> {
    let scores = ctx.scores.as_ref().ok_or(StageFailure {
        stage: "insight",
        reason: "no competitive scores from the prior stage".to_string(),
    })?;
    ctx.insights = Some(generate_insights(scores));
    Ok(ctx)
}

/// Build the final report from whatever the pipeline produced.
///
/// Brands are ordered by rank; a brand only gets a row when every stage
/// produced its piece, which always holds unless a stage was skipped after
/// a recoverable failure — in that case the degradation flags say so.
fn assemble_report(ctx: AnalysisContext) -> Report {
    let aggregates = ctx.aggregates.unwrap_or_default();
    let sov = ctx.sov.unwrap_or_default();
    let scores = ctx.scores.unwrap_or_default();
    let cai = ctx.cai.unwrap_or_default();
    let positions = ctx.positions.unwrap_or_default();
    let mut insights = ctx.insights.unwrap_or_default();

    let mut brands: Vec<BrandReport> = Vec::with_capacity(sov.len());
    for (name, metrics) in &sov {
        let (Some(score), Some(cai_result), Some(position)) =
            (scores.get(name), cai.get(name), positions.get(name))
        else {
            continue;
        };
        brands.push(BrandReport {
            brand: name.clone(),
            sov: metrics.sov,
            rank: metrics.rank,
            mentions: aggregates.get(name).map_or(0, |a| a.mentions),
            composite_score: score.composite,
            sub_scores: score.sub_scores,
            cai: CaiSummary {
                value: cai_result.value,
                classification: cai_result.classification,
            },
            market_position: *position,
            insights: insights.remove(name).unwrap_or_default(),
        });
    }
    brands.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.brand.cmp(&b.brand)));

    Report {
        run_id: Uuid::new_v4(),
        query: ctx.query,
        timestamp: Utc::now(),
        brands,
        collection_incomplete: ctx.collection_incomplete,
        degraded: ctx.degraded,
        degraded_platforms: ctx.degraded_platforms,
        skipped_stages: ctx.skipped_stages,
        unmatched_mentions: ctx.unmatched,
        integrity_dropped: ctx.integrity_dropped,
    }
}

#[cfg(test)]
mod tests {
    use sovint_core::BrandProfile;

    use super::*;

    fn profile(name: &str, aliases: &[&str]) -> BrandProfile {
        BrandProfile {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    #[test]
    fn empty_competitor_set_is_fatal() {
        let ctx = AnalysisContext::new("smart fan", vec![], vec![]);
        let err = run_analysis(ctx).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyCompetitorSet));
    }

    #[test]
    fn degraded_collection_surfaces_on_the_report() {
        let ctx = AnalysisContext::new("smart fan", vec![profile("Atomberg", &["atomberg"])], vec![])
            .with_collection_status(true, vec!["video".to_string()]);
        let report = run_analysis(ctx).unwrap();
        assert!(report.collection_incomplete);
        assert!(report.degraded);
        assert_eq!(report.degraded_platforms, vec!["video".to_string()]);
        assert!(report.skipped_stages.is_empty());
    }

    #[test]
    fn zero_mention_run_still_reports_every_brand() {
        let brands = vec![profile("Atomberg", &["atomberg"]), profile("Havells", &["havells"])];
        let report = run_analysis(AnalysisContext::new("smart fan", brands, vec![])).unwrap();
        assert_eq!(report.brands.len(), 2);
        assert!(!report.collection_incomplete);
        for brand in &report.brands {
            assert!(brand.sov.abs() < f64::EPSILON);
            assert_eq!(brand.rank, 1);
        }
    }
}
