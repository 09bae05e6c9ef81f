//! End-to-end pipeline tests over realistic mention batches.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sovint_analysis::{
    run_analysis, AnalysisContext, CaiClassification, InsightCategory, Quadrant, Report,
};
use sovint_core::{BrandProfile, MentionRecord, Platform};

fn profile(name: &str, aliases: &[&str]) -> BrandProfile {
    BrandProfile {
        name: name.to_string(),
        aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
    }
}

fn mention(platform: Platform, source_id: &str, title: &str, engagement: f64, secs: i64) -> MentionRecord {
    let mut metrics = BTreeMap::new();
    metrics.insert("views".to_string(), engagement);
    MentionRecord {
        platform,
        source_id: source_id.to_string(),
        title: title.to_string(),
        published_at: Utc.timestamp_opt(secs, 0).unwrap(),
        engagement: metrics,
    }
}

/// Batch from the worked example: Aurora with 60 mentions at average
/// engagement 200, Breeze with 40 at 100, single time window.
fn worked_example_batch() -> (Vec<BrandProfile>, Vec<MentionRecord>) {
    let brands = vec![profile("Aurora", &["aurora"]), profile("Breeze", &["breeze"])];
    let mut mentions = Vec::new();
    for i in 0..60 {
        mentions.push(mention(
            Platform::Video,
            &format!("a{i}"),
            "aurora smart fan review",
            200.0,
            1_000,
        ));
    }
    for i in 0..40 {
        mentions.push(mention(
            Platform::Search,
            &format!("b{i}"),
            "breeze smart fan roundup",
            100.0,
            1_000,
        ));
    }
    (brands, mentions)
}

fn brand<'a>(report: &'a Report, name: &str) -> &'a sovint_analysis::BrandReport {
    report
        .brands
        .iter()
        .find(|b| b.brand == name)
        .unwrap_or_else(|| panic!("brand {name} missing from report"))
}

#[test]
fn worked_example_end_to_end() {
    let (brands, mentions) = worked_example_batch();
    let report = run_analysis(AnalysisContext::new("smart fan", brands, mentions)).unwrap();

    assert_eq!(report.query, "smart fan");
    assert!(!report.collection_incomplete);
    assert_eq!(report.unmatched_mentions, 0);
    assert_eq!(report.integrity_dropped, 0);

    let a = brand(&report, "Aurora");
    let b = brand(&report, "Breeze");

    assert!((a.sov - 60.0).abs() < 1e-9);
    assert!((b.sov - 40.0).abs() < 1e-9);
    assert_eq!(a.rank, 1);
    assert_eq!(b.rank, 2);
    assert_eq!(a.mentions, 60);
    assert_eq!(b.mentions, 40);

    assert!((a.sub_scores.market_presence - 100.0).abs() < 1e-9);
    assert!((b.sub_scores.market_presence - 200.0 / 3.0).abs() < 1e-9);
    assert!((a.sub_scores.engagement_quality - 100.0).abs() < 1e-9);
    assert!(b.sub_scores.engagement_quality.abs() < 1e-9);
    assert!((a.sub_scores.competitive_position - 100.0).abs() < 1e-9);
    assert!((b.sub_scores.competitive_position - 50.0).abs() < 1e-9);
    assert!((a.sub_scores.market_dynamics - 50.0).abs() < 1e-9);
    assert!((b.sub_scores.market_dynamics - 50.0).abs() < 1e-9);

    assert!((a.composite_score - 95.0).abs() < 1e-9);
    assert!((b.composite_score - 125.0 / 3.0).abs() < 1e-9);

    // Population std-dev puts both brands exactly one deviation from the
    // mean: the classification boundary itself.
    assert!((a.cai.value - 1.0).abs() < 1e-6, "CAI(A) = {}", a.cai.value);
    assert!((b.cai.value + 1.0).abs() < 1e-6, "CAI(B) = {}", b.cai.value);
    assert!(matches!(
        a.cai.classification,
        CaiClassification::StrongAdvantage | CaiClassification::ModerateAdvantage
    ));
    assert!(matches!(
        b.cai.classification,
        CaiClassification::StrongDisadvantage | CaiClassification::ModerateDisadvantage
    ));

    // Share 1.0 / performance 0.95 and share 0.67 / performance 0.42.
    assert_eq!(a.market_position, Quadrant::Star);
    assert_eq!(b.market_position, Quadrant::CashCow);

    // Report rows are ordered by rank.
    assert_eq!(report.brands[0].brand, "Aurora");
    assert_eq!(report.brands[1].brand, "Breeze");
}

#[test]
fn worked_example_insights() {
    let (brands, mentions) = worked_example_batch();
    let report = run_analysis(AnalysisContext::new("smart fan", brands, mentions)).unwrap();

    // Aurora: three strengths (presence, quality, position) and one
    // dynamics opportunity, ordered by weight-scaled priority.
    let a = brand(&report, "Aurora");
    assert_eq!(a.insights.len(), 4);
    assert_eq!(a.insights[0].category, InsightCategory::Strength);
    assert!(a.insights[0].text.contains("market presence"));
    assert_eq!(a.insights[3].category, InsightCategory::Opportunity);
    assert!(a.insights[3].text.contains("market dynamics"));

    // Breeze: presence sits in the quiet band; the rest are opportunities,
    // engagement quality first (0.30 × 60 = 18).
    let b = brand(&report, "Breeze");
    assert_eq!(b.insights.len(), 3);
    assert!(b.insights.iter().all(|i| i.category == InsightCategory::Opportunity));
    assert!(b.insights[0].text.contains("engagement quality"));
    assert!((b.insights[0].priority - 18.0).abs() < 1e-9);

    for brand_report in &report.brands {
        for pair in brand_report.insights.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }
}

#[test]
fn sov_sums_to_one_hundred_for_nonempty_batches() {
    let (brands, mentions) = worked_example_batch();
    let report = run_analysis(AnalysisContext::new("smart fan", brands, mentions)).unwrap();
    let sum: f64 = report.brands.iter().map(|b| b.sov).sum();
    assert!((sum - 100.0).abs() < 1e-6, "SoV sum was {sum}");
}

#[test]
fn rerun_on_identical_batch_is_deterministic() {
    let (brands, mentions) = worked_example_batch();
    let mut reversed = mentions.clone();
    reversed.reverse();

    let first = run_analysis(AnalysisContext::new("smart fan", brands.clone(), mentions)).unwrap();
    let second = run_analysis(AnalysisContext::new("smart fan", brands, reversed)).unwrap();

    // Everything except run id and timestamp must match byte for byte.
    let brands_a = serde_json::to_value(&first.brands).unwrap();
    let brands_b = serde_json::to_value(&second.brands).unwrap();
    assert_eq!(brands_a, brands_b);
    assert_eq!(first.collection_incomplete, second.collection_incomplete);
    assert_eq!(first.degraded_platforms, second.degraded_platforms);
    assert_eq!(first.unmatched_mentions, second.unmatched_mentions);
    assert_eq!(first.integrity_dropped, second.integrity_dropped);
}

#[test]
fn degraded_platform_run_completes_with_partial_data() {
    // Video collection failed upstream: only search mentions arrive.
    let brands = vec![profile("Aurora", &["aurora"]), profile("Breeze", &["breeze"])];
    let mentions = vec![
        mention(Platform::Search, "s1", "aurora fan review", 40.0, 100),
        mention(Platform::Search, "s2", "breeze fan review", 10.0, 200),
    ];
    let ctx = AnalysisContext::new("smart fan", brands, mentions)
        .with_collection_status(true, vec!["video".to_string()]);

    let report = run_analysis(ctx).unwrap();
    assert!(report.degraded);
    assert!(report.collection_incomplete);
    assert_eq!(report.degraded_platforms, vec!["video".to_string()]);
    assert_eq!(report.brands.len(), 2);
    let sum: f64 = report.brands.iter().map(|b| b.sov).sum();
    assert!((sum - 100.0).abs() < 1e-6);
}

#[test]
fn malformed_records_are_dropped_not_fatal() {
    let brands = vec![profile("Aurora", &["aurora"])];
    let mentions = vec![
        mention(Platform::Search, "", "aurora fan", 10.0, 100),
        mention(Platform::Search, "s1", "aurora fan", 10.0, 100),
        mention(Platform::Search, "s2", "unrelated roundup", 10.0, 100),
    ];
    let report = run_analysis(AnalysisContext::new("fan", brands, mentions)).unwrap();
    assert_eq!(report.integrity_dropped, 1);
    assert_eq!(report.unmatched_mentions, 1);
    assert_eq!(brand(&report, "Aurora").mentions, 1);
}
