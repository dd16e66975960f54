//! Report output for batch correlation runs.
//!
//! Routes the success table and the failure list to either a CSV pair
//! or a SQLite database, selected at startup via `--backend`. Both
//! backends keep results and failures strictly separate.

pub mod csv_writer;
pub mod sqlite_writer;
pub mod writer;
pub mod writer_backend;

pub use csv_writer::CsvReportWriter;
pub use sqlite_writer::SqliteReportWriter;
pub use writer::ReportWriter;
pub use writer_backend::{ReportBackend, ReportWriterError};
