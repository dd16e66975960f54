//! CSV report backend - results in one file, failures in a sibling file.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::pipeline::{CorrelationResult, TickerFailure};

use super::writer_backend::{ReportBackend, ReportWriterError};

/// Writes the success table to `<path>` and failures to
/// `<stem>_failures.csv` next to it, so downstream consumers can never
/// mistake a failed ticker for an absent correlation.
pub struct CsvReportWriter {
    results: csv::Writer<fs::File>,
    failures: csv::Writer<fs::File>,
}

fn failures_path(results_path: &Path) -> PathBuf {
    let stem = results_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let filename = format!("{}_failures.csv", stem);
    match results_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(filename),
        _ => PathBuf::from(filename),
    }
}

impl CsvReportWriter {
    pub fn new(output_path: PathBuf) -> Result<Self, ReportWriterError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let failure_file = failures_path(&output_path);
        let results = csv::Writer::from_path(&output_path)?;
        let mut failures = csv::Writer::from_path(&failure_file)?;
        failures.write_record(["ticker", "error_kind", "detail"])?;

        log::info!("📝 Writing correlation report to: {}", output_path.display());
        log::info!("📝 Writing failure report to: {}", failure_file.display());

        Ok(Self { results, failures })
    }

    pub fn write_result(&mut self, result: &CorrelationResult) -> Result<(), ReportWriterError> {
        self.results.serialize(result)?;
        Ok(())
    }

    pub fn write_failure(&mut self, failure: &TickerFailure) -> Result<(), ReportWriterError> {
        let detail = failure.error.to_string();
        self.failures
            .write_record([failure.ticker.as_str(), failure.error.kind(), detail.as_str()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ReportWriterError> {
        self.results.flush()?;
        self.failures.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ReportBackend for CsvReportWriter {
    async fn write_result(&mut self, result: &CorrelationResult) -> Result<(), ReportWriterError> {
        self.write_result(result)?;
        Ok(())
    }

    async fn write_failure(&mut self, failure: &TickerFailure) -> Result<(), ReportWriterError> {
        self.write_failure(failure)?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        self.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}
