//! Aligns scored news events with daily price returns.
//!
//! The join key is the calendar day. Markets close on weekends and
//! holidays, so the two series never cover the same set of days; the
//! `JoinPolicy` decides what happens to news published when no bar
//! exists. Neither policy ever fabricates a price bar.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::{daily_returns, PriceBar};
use crate::sentiment::SentimentScore;

use super::date_norm::ScoredEvent;

/// How news days without a matching trading day are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Inner join: news on non-trading days is dropped.
    Strict,
    /// Keep every news day and carry the most recent prior trading
    /// day's return forward onto it. Never carries backward.
    CalendarFilled,
}

impl JoinPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinPolicy::Strict => "strict",
            JoinPolicy::CalendarFilled => "calendar-filled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(JoinPolicy::Strict),
            "calendar-filled" | "calendar_filled" => Some(JoinPolicy::CalendarFilled),
            _ => None,
        }
    }
}

/// One news day joined against the return series.
///
/// `daily_return` is `None` when the day has a bar but no prior close
/// (the first bar), or when calendar filling found no earlier trading
/// day to carry forward. Downstream aggregation keeps such days in an
/// auditable excluded partition instead of zeroing them.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedDay {
    pub date: NaiveDate,
    pub scores: Vec<SentimentScore>,
    pub daily_return: Option<f64>,
}

/// Join one ticker's scored events against its price bars.
///
/// Events for other tickers are filtered out first. Output is sorted by
/// date with one entry per news day.
pub fn align(
    events: &[ScoredEvent],
    bars: &[PriceBar],
    ticker: &str,
    policy: JoinPolicy,
) -> Vec<AlignedDay> {
    let mut grouped: BTreeMap<NaiveDate, Vec<SentimentScore>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.ticker == ticker) {
        grouped.entry(event.date).or_default().push(event.score);
    }

    let returns = daily_returns(bars);

    let mut aligned = Vec::with_capacity(grouped.len());
    for (date, scores) in grouped {
        let daily_return = match policy {
            JoinPolicy::Strict => match returns.get(&date) {
                Some(ret) => *ret,
                // No bar on this day: the row leaves the strict join.
                None => continue,
            },
            JoinPolicy::CalendarFilled => returns
                .range(..=date)
                .next_back()
                .and_then(|(_, ret)| *ret),
        };
        aligned.push(AlignedDay {
            date,
            scores,
            daily_return,
        });
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        }
    }

    fn create_test_event(date: &str, ticker: &str, polarity: f64) -> ScoredEvent {
        ScoredEvent {
            date: date.parse().unwrap(),
            ticker: ticker.to_string(),
            score: SentimentScore {
                polarity,
                subjectivity: 0.5,
                word_count: 4,
            },
        }
    }

    fn june_week_bars() -> Vec<PriceBar> {
        // Thu, Fri, then the following Monday. Returns: None, 0.05, -0.01.
        vec![
            create_test_bar("2020-06-04", 100.0),
            create_test_bar("2020-06-05", 105.0),
            create_test_bar("2020-06-08", 103.95),
        ]
    }

    #[test]
    fn test_strict_join_keeps_only_shared_dates() {
        let events = vec![
            create_test_event("2020-06-05", "AAPL", 0.3),
            create_test_event("2020-06-06", "AAPL", -0.2), // Saturday
        ];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::Strict);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].date, "2020-06-05".parse().unwrap());
        assert_eq!(aligned[0].daily_return, Some(0.05));
        assert_eq!(aligned[0].scores.len(), 1);
    }

    #[test]
    fn test_strict_keeps_first_bar_day_with_undefined_return() {
        // A bar exists on the first day even though its return does not.
        let events = vec![create_test_event("2020-06-04", "AAPL", 0.1)];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::Strict);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].daily_return, None);
    }

    #[test]
    fn test_calendar_filled_carries_prior_return_forward() {
        let events = vec![
            create_test_event("2020-06-06", "AAPL", 0.4), // Saturday
            create_test_event("2020-06-07", "AAPL", 0.2), // Sunday
        ];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::CalendarFilled);

        assert_eq!(aligned.len(), 2);
        // Both weekend days get Friday's return, never Monday's.
        assert_eq!(aligned[0].daily_return, Some(0.05));
        assert_eq!(aligned[1].daily_return, Some(0.05));
        assert_ne!(aligned[0].daily_return, Some(-0.01));
    }

    #[test]
    fn test_calendar_filled_keeps_uncovered_dates_as_undefined() {
        // News before any bar exists: no return to carry forward.
        let events = vec![create_test_event("2020-06-01", "AAPL", 0.9)];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::CalendarFilled);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].daily_return, None);
    }

    #[test]
    fn test_other_tickers_are_filtered_out() {
        let events = vec![
            create_test_event("2020-06-05", "AAPL", 0.3),
            create_test_event("2020-06-05", "MSFT", -0.8),
        ];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::Strict);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].scores[0].polarity, 0.3);
    }

    #[test]
    fn test_same_day_events_group_into_one_entry() {
        let events = vec![
            create_test_event("2020-06-05", "AAPL", 0.3),
            create_test_event("2020-06-05", "AAPL", -0.1),
        ];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::Strict);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].scores.len(), 2);
    }

    #[test]
    fn test_no_overlap_yields_empty() {
        let events = vec![create_test_event("2019-01-01", "AAPL", 0.3)];
        let aligned = align(&events, &june_week_bars(), "AAPL", JoinPolicy::Strict);
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_join_policy_round_trips_from_str() {
        assert_eq!(JoinPolicy::from_str("strict"), Some(JoinPolicy::Strict));
        assert_eq!(
            JoinPolicy::from_str("calendar-filled"),
            Some(JoinPolicy::CalendarFilled)
        );
        assert_eq!(
            JoinPolicy::from_str("CALENDAR_FILLED"),
            Some(JoinPolicy::CalendarFilled)
        );
        assert_eq!(JoinPolicy::from_str("outer"), None);
    }
}
