//! Unified writer interface for batch reports
//!
//! Routes writes to either the CSV or SQLite backend based on configuration.

use std::path::PathBuf;

use crate::config::BackendType;
use crate::pipeline::{CorrelationResult, TickerFailure};

use super::csv_writer::CsvReportWriter;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::{ReportBackend, ReportWriterError};

/// Unified writer that routes to either CSV or SQLite backend
pub enum ReportWriter {
    Csv(CsvReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    /// Create a new report writer based on backend type
    pub fn new(backend: BackendType, output_path: PathBuf) -> Result<Self, ReportWriterError> {
        match backend {
            BackendType::Csv => {
                let writer = CsvReportWriter::new(output_path)?;
                Ok(ReportWriter::Csv(writer))
            }
            BackendType::Sqlite => {
                let writer = SqliteReportWriter::new(output_path)?;
                Ok(ReportWriter::Sqlite(writer))
            }
        }
    }

    /// Write a correlation result to the configured backend
    pub async fn write_result(
        &mut self,
        result: &CorrelationResult,
    ) -> Result<(), ReportWriterError> {
        match self {
            ReportWriter::Csv(w) => {
                w.write_result(result)?;
                Ok(())
            }
            ReportWriter::Sqlite(w) => w.write_result(result).await,
        }
    }

    /// Record a per-ticker failure in the configured backend
    pub async fn write_failure(
        &mut self,
        failure: &TickerFailure,
    ) -> Result<(), ReportWriterError> {
        match self {
            ReportWriter::Csv(w) => {
                w.write_failure(failure)?;
                Ok(())
            }
            ReportWriter::Sqlite(w) => w.write_failure(failure).await,
        }
    }

    /// Flush pending writes to storage
    pub async fn flush(&mut self) -> Result<(), ReportWriterError> {
        match self {
            ReportWriter::Csv(w) => {
                w.flush()?;
                Ok(())
            }
            ReportWriter::Sqlite(w) => w.flush().await,
        }
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Csv(_) => "CSV",
            ReportWriter::Sqlite(_) => "SQLite",
        }
    }
}
