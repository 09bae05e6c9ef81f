use thiserror::Error;

/// Fatal analysis errors. Raised before any stage executes; the pipeline
/// never returns a partial report for these.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("empty competitor set: the brand registry must define at least one brand")]
    EmptyCompetitorSet,
}

/// A recoverable failure inside one pipeline stage.
///
/// The coordinator absorbs these: it marks the context degraded, records
/// the stage, and continues with the data already present.
#[derive(Debug, Clone, Error)]
#[error("stage {stage} failed: {reason}")]
pub struct StageFailure {
    pub stage: &'static str,
    pub reason: String,
}
