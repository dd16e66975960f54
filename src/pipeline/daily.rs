//! Collapses each aligned news day into one row of the daily table.

use chrono::NaiveDate;

use crate::stats;

use super::aligner::AlignedDay;

/// One (ticker, date) row of the daily sentiment/return table.
///
/// Undefined statistics stay `None`. A day with no events has no mean
/// polarity, a day with one event has no dispersion estimate, and a day
/// without a prior close has no return. Zero is a real value in all
/// three fields and must never stand in for "unknown".
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub ticker: String,
    pub mean_polarity: Option<f64>,
    pub polarity_std: Option<f64>,
    pub mean_subjectivity: Option<f64>,
    pub event_count: usize,
    pub daily_return: Option<f64>,
}

/// The daily table split into rows correlation can use and rows it
/// cannot. Excluded rows are kept so coverage gaps stay inspectable.
#[derive(Debug, Default)]
pub struct DailyTable {
    pub usable: Vec<DailyRecord>,
    pub excluded: Vec<DailyRecord>,
}

impl DailyTable {
    pub fn total_rows(&self) -> usize {
        self.usable.len() + self.excluded.len()
    }
}

/// Aggregate one aligned day into a `DailyRecord`.
///
/// Total over its input: an empty group yields event_count 0 with
/// undefined means rather than an error or a zeroed row.
pub fn aggregate_day(ticker: &str, day: &AlignedDay) -> DailyRecord {
    let polarities: Vec<f64> = day.scores.iter().map(|s| s.polarity).collect();
    let subjectivities: Vec<f64> = day.scores.iter().map(|s| s.subjectivity).collect();

    DailyRecord {
        date: day.date,
        ticker: ticker.to_string(),
        mean_polarity: stats::mean(&polarities),
        polarity_std: stats::sample_std_dev(&polarities),
        mean_subjectivity: stats::mean(&subjectivities),
        event_count: day.scores.len(),
        daily_return: day.daily_return,
    }
}

/// Build the daily table for a ticker, partitioning rows by usability.
///
/// A row is usable for correlation only when both its daily return and
/// its mean polarity are defined; everything else lands in the excluded
/// partition.
pub fn aggregate(ticker: &str, days: &[AlignedDay]) -> DailyTable {
    let mut table = DailyTable::default();
    for day in days {
        let record = aggregate_day(ticker, day);
        if record.daily_return.is_some() && record.mean_polarity.is_some() {
            table.usable.push(record);
        } else {
            table.excluded.push(record);
        }
    }
    table
}
