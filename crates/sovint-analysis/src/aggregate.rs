//! Mention aggregation: integrity filtering, deduplication, and brand
//! assignment.
//!
//! Deterministic regardless of input order: deduplication keys on
//! `(platform, source_id)` keeping the earliest `published_at`, and all
//! per-brand state lives in ordered maps.

use std::collections::BTreeMap;

use sovint_core::{BrandProfile, MentionRecord, Platform};

use crate::types::BrandAggregate;

/// Output of the aggregation stage.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// One entry per registry brand, zero-valued when nothing matched.
    pub aggregates: BTreeMap<String, BrandAggregate>,
    /// Records dropped for a missing/empty `source_id`.
    pub integrity_dropped: usize,
    /// Deduplicated records that matched no brand alias.
    pub unmatched: usize,
}

/// Normalize, deduplicate, and group raw mention records by brand.
///
/// Records with an empty `source_id` are dropped and counted (a data
/// integrity problem, logged, never fatal). Duplicates sharing a
/// `(platform, source_id)` key collapse to the copy with the earliest
/// `published_at`. Each surviving record is assigned to the first registry
/// brand with an alias appearing case-insensitively in its title; records
/// matching no alias are dropped and counted for transparency.
#[must_use]
pub fn aggregate_mentions(brands: &[BrandProfile], mentions: &[MentionRecord]) -> Aggregation {
    let mut integrity_dropped = 0usize;
    let mut deduped: BTreeMap<(Platform, String), &MentionRecord> = BTreeMap::new();

    for record in mentions {
        if record.source_id.trim().is_empty() {
            integrity_dropped += 1;
            tracing::warn!(
                platform = %record.platform,
                title = %record.title,
                "dropping mention with empty source_id"
            );
            continue;
        }

        let key = (record.platform, record.source_id.clone());
        match deduped.get(&key) {
            Some(existing) if existing.published_at <= record.published_at => {}
            _ => {
                deduped.insert(key, record);
            }
        }
    }

    // Every registry brand gets an entry, even with zero mentions, so the
    // downstream stages always score the full competitor set.
    let mut aggregates: BTreeMap<String, BrandAggregate> = brands
        .iter()
        .map(|b| (b.name.clone(), BrandAggregate::default()))
        .collect();

    let lowered: Vec<(String, Vec<String>)> = brands
        .iter()
        .map(|b| {
            (
                b.name.clone(),
                b.aliases.iter().map(|a| a.to_lowercase()).collect(),
            )
        })
        .collect();

    let mut unmatched = 0usize;

    for record in deduped.values() {
        let Some(brand) = match_brand(&lowered, &record.title) else {
            unmatched += 1;
            continue;
        };

        if let Some(agg) = aggregates.get_mut(brand) {
            agg.mentions += 1;
            *agg.platform_counts.entry(record.platform).or_insert(0) += 1;
            agg.engagement_sum += record.engagement_total();
            agg.timestamps.push(record.published_at);
        }
    }

    if integrity_dropped > 0 || unmatched > 0 {
        tracing::info!(
            integrity_dropped,
            unmatched,
            retained = deduped.len() - unmatched,
            "mention aggregation dropped records"
        );
    }

    Aggregation {
        aggregates,
        integrity_dropped,
        unmatched,
    }
}

/// First registry brand with an alias contained in the title,
/// case-insensitively. Registry order decides ties between brands.
fn match_brand<'a>(lowered: &'a [(String, Vec<String>)], title: &str) -> Option<&'a str> {
    let title_lower = title.to_lowercase();
    for (name, aliases) in lowered {
        if aliases.iter().any(|a| title_lower.contains(a.as_str())) {
            return Some(name.as_str());
        }
    }
    None
}
