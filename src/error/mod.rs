//! Error handling for the corrections pipeline.
//!
//! Data-quality problems in raw records are never surfaced as errors: the
//! pre-processing stages drop the offending record and log a diagnostic.
//! The variants here cover contract violations by callers, which must fail
//! the person's pipeline run loudly.

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A period handed to an index query is not a member of that index
    #[error("incarceration period [{period_id}] not found in this period index")]
    PeriodNotInIndex {
        /// Identifier of the period that was looked up
        period_id: i64,
    },

    /// A period reached a point where pre-processing guarantees an identifier
    #[error("unexpected incarceration period without a period_id")]
    MissingPeriodId,

    /// A period reached the index without an inferred admission reason
    #[error("pre-processing did not set an admission_reason on period [{period_id}]")]
    MissingAdmissionReason {
        /// Identifier of the offending period
        period_id: i64,
    },

    /// An operation needed a dated period but none of the dates were set
    #[error("period [{period_id}] has no admission_date to derive a duration from")]
    UndatedPeriod {
        /// Identifier of the offending period
        period_id: i64,
    },

    /// Caller-supplied configuration or query arguments were invalid
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
