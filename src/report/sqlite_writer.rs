//! SQLite report backend with batched transactional writes.
//!
//! Results append across runs; every row carries the run's
//! `computed_at` timestamp so the latest batch stays queryable.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::pipeline::{CorrelationResult, TickerFailure};

use super::writer_backend::{ReportBackend, ReportWriterError};

const BATCH_SIZE: usize = 100;

pub struct SqliteReportWriter {
    conn: Connection,
    result_batch: Vec<CorrelationResult>,
    failure_batch: Vec<TickerFailure>,
    computed_at: i64,
}

impl SqliteReportWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ReportWriterError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ReportWriterError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!(
                            "Failed to create database directory {}: {}",
                            parent.display(),
                            e
                        ),
                    ))
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        // WAL + relaxed sync; these pragmas return rows, so pragma_update
        // rather than execute.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;
        conn.pragma_update(None, "temp_store", "MEMORY")
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;
        conn.pragma_update(None, "wal_autocheckpoint", 1000)
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS correlations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                metric_pair TEXT NOT NULL,
                coefficient REAL NOT NULL,
                p_value REAL NOT NULL,
                sample_size INTEGER NOT NULL,
                computed_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_correlations_ticker
             ON correlations(ticker, computed_at DESC)",
            [],
        )
        .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS batch_failures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                error_kind TEXT NOT NULL,
                detail TEXT NOT NULL,
                computed_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        let computed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        log::info!("✅ SQLite report database initialized with WAL mode");

        Ok(Self {
            conn,
            result_batch: Vec::with_capacity(BATCH_SIZE),
            failure_batch: Vec::new(),
            computed_at,
        })
    }

    fn buffer_result(&mut self, result: &CorrelationResult) -> Result<(), ReportWriterError> {
        self.result_batch.push(result.clone());
        if self.result_batch.len() >= BATCH_SIZE {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn buffer_failure(&mut self, failure: &TickerFailure) -> Result<(), ReportWriterError> {
        self.failure_batch.push(failure.clone());
        if self.failure_batch.len() >= BATCH_SIZE {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn flush_batch(&mut self) -> Result<(), ReportWriterError> {
        if self.result_batch.is_empty() && self.failure_batch.is_empty() {
            return Ok(());
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        for result in &self.result_batch {
            tx.execute(
                "INSERT INTO correlations
                 (ticker, metric_pair, coefficient, p_value, sample_size, computed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    result.ticker,
                    result.metric_pair,
                    result.coefficient,
                    result.p_value,
                    result.sample_size as i64,
                    self.computed_at,
                ],
            )
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;
        }

        for failure in &self.failure_batch {
            tx.execute(
                "INSERT INTO batch_failures (ticker, error_kind, detail, computed_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    failure.ticker,
                    failure.error.kind(),
                    failure.error.to_string(),
                    self.computed_at,
                ],
            )
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| ReportWriterError::Database(e.to_string()))?;

        log::debug!(
            "✅ Flushed {} results and {} failures to SQLite",
            self.result_batch.len(),
            self.failure_batch.len()
        );
        self.result_batch.clear();
        self.failure_batch.clear();

        Ok(())
    }
}

#[async_trait]
impl ReportBackend for SqliteReportWriter {
    async fn write_result(&mut self, result: &CorrelationResult) -> Result<(), ReportWriterError> {
        self.buffer_result(result)
    }

    async fn write_failure(&mut self, failure: &TickerFailure) -> Result<(), ReportWriterError> {
        self.buffer_failure(failure)
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        self.flush_batch()
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineError;
    use tempfile::tempdir;

    fn create_test_result(ticker: &str, coefficient: f64) -> CorrelationResult {
        CorrelationResult {
            ticker: ticker.to_string(),
            metric_pair: "mean_polarity_vs_daily_return".to_string(),
            coefficient,
            p_value: 0.05,
            sample_size: 20,
        }
    }

    fn create_test_failure(ticker: &str) -> TickerFailure {
        TickerFailure {
            ticker: ticker.to_string(),
            error: PipelineError::EmptyAlignment {
                ticker: ticker.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_sqlite_report_write() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut writer = SqliteReportWriter::new(&db_path).unwrap();

        writer
            .write_result(&create_test_result("AAPL", 0.42))
            .await
            .unwrap();
        writer
            .write_failure(&create_test_failure("MSFT"))
            .await
            .unwrap();
        writer.flush().await.unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let (coefficient, sample_size): (f64, i64) = conn
            .query_row(
                "SELECT coefficient, sample_size FROM correlations WHERE ticker = ?1",
                params!["AAPL"],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(coefficient, 0.42);
        assert_eq!(sample_size, 20);

        let error_kind: String = conn
            .query_row(
                "SELECT error_kind FROM batch_failures WHERE ticker = ?1",
                params!["MSFT"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(error_kind, "empty_alignment");
    }

    #[tokio::test]
    async fn test_batch_auto_flush() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut writer = SqliteReportWriter::new(&db_path).unwrap();

        // 150 writes should trigger one auto-flush at 100
        for i in 0..150 {
            writer
                .write_result(&create_test_result(&format!("T{}", i), 0.1))
                .await
                .unwrap();
        }
        writer.flush().await.unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM correlations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 150);
    }

    #[tokio::test]
    async fn test_results_append_across_runs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        {
            let mut writer = SqliteReportWriter::new(&db_path).unwrap();
            writer
                .write_result(&create_test_result("AAPL", 0.1))
                .await
                .unwrap();
            writer.flush().await.unwrap();
        }
        {
            let mut writer = SqliteReportWriter::new(&db_path).unwrap();
            writer
                .write_result(&create_test_result("AAPL", 0.2))
                .await
                .unwrap();
            writer.flush().await.unwrap();
        }

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM correlations WHERE ticker = 'AAPL'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_wal_checkpoint_configured() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let _writer = SqliteReportWriter::new(&db_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");

        let checkpoint: i32 = conn
            .query_row("PRAGMA wal_autocheckpoint", [], |row| row.get(0))
            .unwrap();
        assert_eq!(checkpoint, 1000);
    }
}
