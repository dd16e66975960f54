//! # Sentiment/Price Correlation Pipeline
//!
//! This module implements the per-ticker analysis pipeline:
//! - Normalizes mixed-format news timestamps to calendar day keys
//! - Aligns scored news events with daily price returns
//! - Aggregates per-day sentiment metrics (mean, spread, volume)
//! - Computes Pearson correlations with significance tests
//! - Runs the whole flow across a ticker universe with fault isolation
//!
//! ## Data Flow
//!
//! ```text
//! NewsEvent ──score──> ScoredEvent ──align──> AlignedDay ──aggregate──> DailyRecord
//!                                     │                                     │
//! PriceBar ──daily_returns────────────┘                                     │
//!                                                                           ▼
//!                                                  CorrelationEngine ──> CorrelationResult
//! ```
//!
//! Every stage is total over its input: records that cannot participate
//! (malformed timestamps, dates without price coverage, days with no
//! defined metrics) are dropped into counted/auditable partitions rather
//! than silently coerced to zero.
//!
//! ## Module Organization
//!
//! - `date_norm` - Timestamp parsing and day-key normalization
//! - `aligner` - Sentiment/return join under a configurable policy
//! - `daily` - Per-day aggregation into the daily metrics table
//! - `correlation` - Pearson r + p-value over metric pairs
//! - `batch` - Multi-ticker runner with per-ticker fault isolation

pub mod aligner;
pub mod batch;
pub mod correlation;
pub mod daily;
pub mod date_norm;

// Re-export commonly used types
pub use aligner::{align, AlignedDay, JoinPolicy};
pub use batch::{BatchOutcome, BatchRunner, TickerFailure};
pub use correlation::{
    default_pairs, CorrelationEngine, CorrelationResult, Metric, MetricPair, MIN_SAMPLES,
};
pub use daily::{aggregate, DailyRecord, DailyTable};
pub use date_norm::{score_events, MalformedTimestamp, ScoredEvent};

/// Errors surfaced by pipeline stages.
///
/// Every variant carries enough context to attribute the failure to a
/// ticker or input source. None of these are panics: a batch run records
/// them per ticker and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// An input (news file, price file) could not be read or parsed at all.
    SourceUnavailable { source: String, reason: String },
    /// The sentiment/price join produced zero overlapping dates.
    EmptyAlignment { ticker: String },
    /// Fewer paired observations than the minimum required for a correlation.
    InsufficientData { pair: String, observed: usize },
    /// One side of a metric pair is constant, so Pearson r is undefined.
    ZeroVariance { pair: String },
}

impl PipelineError {
    /// Stable machine-readable tag, used in failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::SourceUnavailable { .. } => "source_unavailable",
            PipelineError::EmptyAlignment { .. } => "empty_alignment",
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::ZeroVariance { .. } => "zero_variance",
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::SourceUnavailable { source, reason } => {
                write!(f, "source unavailable: {} ({})", source, reason)
            }
            PipelineError::EmptyAlignment { ticker } => {
                write!(f, "no overlapping dates after join for {}", ticker)
            }
            PipelineError::InsufficientData { pair, observed } => {
                write!(
                    f,
                    "insufficient data for {}: {} paired observations, need {}",
                    pair, observed, MIN_SAMPLES
                )
            }
            PipelineError::ZeroVariance { pair } => {
                write!(f, "zero variance in {} input", pair)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        let err = PipelineError::EmptyAlignment {
            ticker: "AAPL".to_string(),
        };
        assert_eq!(err.kind(), "empty_alignment");

        let err = PipelineError::InsufficientData {
            pair: "mean_polarity_vs_daily_return".to_string(),
            observed: 2,
        };
        assert_eq!(err.kind(), "insufficient_data");
        assert!(err.to_string().contains("2 paired observations"));
    }

    #[test]
    fn test_source_unavailable_display_names_the_source() {
        let err = PipelineError::SourceUnavailable {
            source: "data/prices/MSFT_historical_data.csv".to_string(),
            reason: "No such file or directory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MSFT_historical_data.csv"));
        assert!(msg.contains("No such file"));
    }
}
