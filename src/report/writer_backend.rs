//! Report backend trait
//!
//! Defines the interface for writing correlation results and per-ticker
//! failures to different backends.

use async_trait::async_trait;

use crate::pipeline::{CorrelationResult, TickerFailure};

#[derive(Debug)]
pub enum ReportWriterError {
    Io(std::io::Error),
    Csv(csv::Error),
    Database(String),
}

impl From<std::io::Error> for ReportWriterError {
    fn from(err: std::io::Error) -> Self {
        ReportWriterError::Io(err)
    }
}

impl From<csv::Error> for ReportWriterError {
    fn from(err: csv::Error) -> Self {
        ReportWriterError::Csv(err)
    }
}

impl std::fmt::Display for ReportWriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWriterError::Io(e) => write!(f, "IO error: {}", e),
            ReportWriterError::Csv(e) => write!(f, "CSV error: {}", e),
            ReportWriterError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReportWriterError {}

/// Backend trait for writing batch reports
#[async_trait]
pub trait ReportBackend: Send {
    /// Write a single correlation result
    async fn write_result(&mut self, result: &CorrelationResult) -> Result<(), ReportWriterError>;

    /// Record a per-ticker failure, kept apart from the success table
    async fn write_failure(&mut self, failure: &TickerFailure) -> Result<(), ReportWriterError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ReportWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
