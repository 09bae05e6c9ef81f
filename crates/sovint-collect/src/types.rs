use sovint_core::MentionRecord;

/// A platform that failed, timed out, or never reported before the
/// deadline.
#[derive(Debug, Clone)]
pub struct PlatformFailure {
    pub platform: String,
    pub reason: String,
}

/// The settled result of one collection round across all platforms.
#[derive(Debug, Clone, Default)]
pub struct CollectionOutcome {
    pub records: Vec<MentionRecord>,
    pub failures: Vec<PlatformFailure>,
    /// True when the overall deadline elapsed before every platform
    /// settled.
    pub incomplete: bool,
}

impl CollectionOutcome {
    /// Sorted, deduplicated platform names that did not deliver a full
    /// batch — the `degradedPlatforms` list on the final report.
    #[must_use]
    pub fn degraded_platforms(&self) -> Vec<String> {
        let mut platforms: Vec<String> =
            self.failures.iter().map(|f| f.platform.clone()).collect();
        platforms.sort();
        platforms.dedup();
        platforms
    }
}
