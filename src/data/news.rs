//! News event records and the analyst-ratings CSV loader.

use crate::pipeline::PipelineError;
use std::path::Path;

/// One dated headline as ingested, before normalization or scoring.
/// Immutable once loaded.
#[derive(Debug, Clone)]
pub struct NewsEvent {
    pub raw_timestamp: String,
    pub headline: String,
    pub ticker: String,
    pub publisher: Option<String>,
}

/// Load news events from an analyst-ratings style CSV.
///
/// Columns are located by header name (case-insensitive): `date`, `stock`,
/// `headline`, and optionally `publisher`; extra columns are ignored. A
/// missing headline becomes an empty string so the scorer's neutral
/// fallback applies. Rows with a blank ticker are skipped and counted.
/// Unparsable timestamps are NOT filtered here; the normalizer drops and
/// counts them.
pub fn load_news(path: impl AsRef<Path>) -> Result<Vec<NewsEvent>, PipelineError> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let mut reader = csv::Reader::from_path(path).map_err(|e| PipelineError::SourceUnavailable {
        source: source.clone(),
        reason: e.to_string(),
    })?;

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::SourceUnavailable {
            source: source.clone(),
            reason: e.to_string(),
        })?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let missing = |name: &str| PipelineError::SourceUnavailable {
        source: source.clone(),
        reason: format!("missing '{}' column", name),
    };

    let date_col = column("date").ok_or_else(|| missing("date"))?;
    let ticker_col = column("stock").ok_or_else(|| missing("stock"))?;
    let headline_col = column("headline").ok_or_else(|| missing("headline"))?;
    let publisher_col = column("publisher");

    let mut events = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let ticker = record.get(ticker_col).unwrap_or("").trim();
        if ticker.is_empty() {
            skipped += 1;
            continue;
        }

        let publisher = publisher_col
            .and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        events.push(NewsEvent {
            raw_timestamp: record.get(date_col).unwrap_or("").to_string(),
            headline: record.get(headline_col).unwrap_or("").to_string(),
            ticker: ticker.to_string(),
            publisher,
        });
    }

    if skipped > 0 {
        log::warn!("{}: skipped {} rows without a usable ticker", source, skipped);
    }
    log::debug!("{}: loaded {} news rows", source, events.len());

    Ok(events)
}
