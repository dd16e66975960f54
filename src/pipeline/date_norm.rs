//! Timestamp normalization for news events.
//!
//! Publisher feeds mix several timestamp conventions in the same file:
//! RFC 3339 with UTC offsets, naive datetimes, bare dates, slash dates
//! and spelled-out month forms. Everything collapses to a `NaiveDate`
//! day key so downstream joins only ever compare calendar days.
//!
//! Offset-carrying timestamps keep their **local** calendar date. A
//! late-evening New York article stays on its publication day instead
//! of drifting into the next UTC day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::data::NewsEvent;
use crate::sentiment::{Scorer, SentimentScore};

/// Datetime formats that carry an explicit UTC offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Datetime formats without an offset. The date component is taken as-is.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Date-only formats, ISO first so normalized output re-parses cheaply.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// A timestamp string that matched none of the supported formats.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedTimestamp {
    pub raw: String,
}

impl std::fmt::Display for MalformedTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized timestamp: {}", self.raw)
    }
}

impl std::error::Error for MalformedTimestamp {}

/// Normalize a raw timestamp string to its calendar day key.
///
/// Tries RFC 3339 first, then the offset/naive/date-only format lists in
/// order. Whitespace is trimmed before parsing. Returns
/// `MalformedTimestamp` if nothing matches; callers drop and count those
/// rather than guessing.
pub fn normalize(raw: &str) -> Result<NaiveDate, MalformedTimestamp> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MalformedTimestamp {
            raw: raw.to_string(),
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date_naive());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }

    Err(MalformedTimestamp {
        raw: raw.to_string(),
    })
}

/// A news event with its timestamp resolved to a day key and its
/// headline scored.
#[derive(Debug, Clone)]
pub struct ScoredEvent {
    pub date: NaiveDate,
    pub ticker: String,
    pub score: SentimentScore,
}

/// Score every event and resolve its day key.
///
/// Events whose timestamp fails to normalize are dropped. The second
/// return value is the drop count so callers can log the data loss
/// instead of it vanishing silently.
pub fn score_events(events: &[NewsEvent], scorer: &dyn Scorer) -> (Vec<ScoredEvent>, usize) {
    let mut scored = Vec::with_capacity(events.len());
    let mut dropped = 0usize;

    for event in events {
        match normalize(&event.raw_timestamp) {
            Ok(date) => scored.push(ScoredEvent {
                date,
                ticker: event.ticker.clone(),
                score: scorer.score(&event.headline),
            }),
            Err(err) => {
                dropped += 1;
                debug!("Dropping news row for {}: {}", event.ticker, err);
            }
        }
    }

    (scored, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconScorer;

    fn create_test_event(raw_timestamp: &str, ticker: &str) -> NewsEvent {
        NewsEvent {
            raw_timestamp: raw_timestamp.to_string(),
            headline: "Analysts raise price target".to_string(),
            ticker: ticker.to_string(),
            publisher: None,
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize("2020-06-05 10:30:54-04:00").unwrap();
        let second = normalize(&first.to_string()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_offset_timestamp_keeps_local_date() {
        // 22:30 in New York is already past midnight UTC; the article
        // still belongs to its local publication day.
        let date = normalize("2020-06-05 22:30:54-04:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 6, 5).unwrap());
    }

    #[test]
    fn test_mixed_formats_share_one_day_key() {
        let expected = NaiveDate::from_ymd_opt(2020, 6, 5).unwrap();
        let variants = [
            "2020-06-05T09:00:00+00:00",
            "2020-06-05 10:30:54",
            "2020-06-05",
            "2020/06/05",
            "06/05/2020",
            "Jun 5, 2020",
            "5 Jun 2020",
        ];
        for raw in variants {
            assert_eq!(normalize(raw).unwrap(), expected, "failed on {:?}", raw);
        }
    }

    #[test]
    fn test_fractional_seconds_parse() {
        let date = normalize("2020-06-05 10:30:54.123456").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 6, 5).unwrap());
    }

    #[test]
    fn test_garbage_and_empty_are_rejected() {
        assert!(normalize("not a date").is_err());
        assert!(normalize("").is_err());
        assert!(normalize("   ").is_err());
        assert!(normalize("2020-13-45").is_err());
    }

    #[test]
    fn test_malformed_display_includes_raw_input() {
        let err = normalize("garbled").unwrap_err();
        assert!(err.to_string().contains("garbled"));
    }

    #[test]
    fn test_score_events_drops_and_counts_malformed() {
        let events = vec![
            create_test_event("2020-06-05", "AAPL"),
            create_test_event("definitely not a timestamp", "AAPL"),
            create_test_event("2020-06-08 09:15:00", "AAPL"),
        ];
        let scorer = LexiconScorer::new();

        let (scored, dropped) = score_events(&events, &scorer);

        assert_eq!(scored.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(
            scored[0].date,
            NaiveDate::from_ymd_opt(2020, 6, 5).unwrap()
        );
        assert_eq!(
            scored[1].date,
            NaiveDate::from_ymd_opt(2020, 6, 8).unwrap()
        );
    }
}
