//! Pearson correlation between daily sentiment metrics and returns.

use serde::{Deserialize, Serialize};

use crate::stats;

use super::daily::DailyRecord;
use super::PipelineError;

/// Minimum paired observations for a meaningful coefficient.
pub const MIN_SAMPLES: usize = 3;

/// A numeric series selectable from the daily table.
///
/// Extraction is `Option`-valued: records where the metric is undefined
/// are skipped pair-by-pair, never zero-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    MeanPolarity,
    PolarityStd,
    MeanSubjectivity,
    EventCount,
    DailyReturn,
    AbsReturn,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::MeanPolarity => "mean_polarity",
            Metric::PolarityStd => "polarity_std",
            Metric::MeanSubjectivity => "mean_subjectivity",
            Metric::EventCount => "event_count",
            Metric::DailyReturn => "daily_return",
            Metric::AbsReturn => "abs_return",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mean_polarity" => Some(Metric::MeanPolarity),
            "polarity_std" => Some(Metric::PolarityStd),
            "mean_subjectivity" => Some(Metric::MeanSubjectivity),
            "event_count" => Some(Metric::EventCount),
            "daily_return" => Some(Metric::DailyReturn),
            "abs_return" => Some(Metric::AbsReturn),
            _ => None,
        }
    }

    /// Pull this metric out of a daily record, if defined there.
    pub fn extract(&self, record: &DailyRecord) -> Option<f64> {
        match self {
            Metric::MeanPolarity => record.mean_polarity,
            Metric::PolarityStd => record.polarity_std,
            Metric::MeanSubjectivity => record.mean_subjectivity,
            Metric::EventCount => Some(record.event_count as f64),
            Metric::DailyReturn => record.daily_return,
            Metric::AbsReturn => record.daily_return.map(f64::abs),
        }
    }
}

/// An (x, y) metric pair to correlate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricPair {
    pub x: Metric,
    pub y: Metric,
}

impl MetricPair {
    pub fn new(x: Metric, y: Metric) -> Self {
        Self { x, y }
    }

    /// Stable pair name used in reports, e.g. `mean_polarity_vs_daily_return`.
    pub fn label(&self) -> String {
        format!("{}_vs_{}", self.x.as_str(), self.y.as_str())
    }
}

/// The two pairs every run computes unless configured otherwise:
/// directional sentiment vs. raw return, and news volume vs. absolute
/// return (a volatility relationship, not a directional one).
pub fn default_pairs() -> Vec<MetricPair> {
    vec![
        MetricPair::new(Metric::MeanPolarity, Metric::DailyReturn),
        MetricPair::new(Metric::EventCount, Metric::AbsReturn),
    ]
}

/// One correlation outcome for a (ticker, metric pair) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub ticker: String,
    pub metric_pair: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub sample_size: usize,
}

/// Computes Pearson r and its two-sided p-value over the usable daily
/// table, pairwise-complete per metric pair.
#[derive(Debug, Default)]
pub struct CorrelationEngine;

impl CorrelationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Correlate one metric pair for one ticker.
    ///
    /// Records where either side is undefined are dropped for this pair
    /// only. Below `MIN_SAMPLES` remaining pairs this is an
    /// `InsufficientData` error, never a NaN result; a constant series
    /// is `ZeroVariance`.
    pub fn correlate_pair(
        &self,
        ticker: &str,
        records: &[DailyRecord],
        pair: MetricPair,
    ) -> Result<CorrelationResult, PipelineError> {
        let mut xs = Vec::with_capacity(records.len());
        let mut ys = Vec::with_capacity(records.len());
        for record in records {
            if let (Some(x), Some(y)) = (pair.x.extract(record), pair.y.extract(record)) {
                xs.push(x);
                ys.push(y);
            }
        }

        if xs.len() < MIN_SAMPLES {
            return Err(PipelineError::InsufficientData {
                pair: pair.label(),
                observed: xs.len(),
            });
        }

        let (coefficient, p_value) =
            stats::pearson_with_p(&xs, &ys).ok_or_else(|| PipelineError::ZeroVariance {
                pair: pair.label(),
            })?;

        Ok(CorrelationResult {
            ticker: ticker.to_string(),
            metric_pair: pair.label(),
            coefficient,
            p_value,
            sample_size: xs.len(),
        })
    }

    /// Correlate every requested pair, keeping per-pair errors separate
    /// so one undefined pair does not mask the others.
    pub fn correlate(
        &self,
        ticker: &str,
        records: &[DailyRecord],
        pairs: &[MetricPair],
    ) -> Vec<Result<CorrelationResult, PipelineError>> {
        pairs
            .iter()
            .map(|&pair| self.correlate_pair(ticker, records, pair))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_record(
        day: u32,
        mean_polarity: Option<f64>,
        event_count: usize,
        daily_return: Option<f64>,
    ) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2020, 6, day).unwrap(),
            ticker: "AAPL".to_string(),
            mean_polarity,
            polarity_std: None,
            mean_subjectivity: Some(0.5),
            event_count,
            daily_return,
        }
    }

    fn polarity_vs_return() -> MetricPair {
        MetricPair::new(Metric::MeanPolarity, Metric::DailyReturn)
    }

    #[test]
    fn test_two_pairs_is_insufficient_three_is_not() {
        let engine = CorrelationEngine::new();
        let mut records = vec![
            create_test_record(1, Some(0.1), 1, Some(0.010)),
            create_test_record(2, Some(0.3), 2, Some(0.024)),
        ];

        let err = engine
            .correlate_pair("AAPL", &records, polarity_vs_return())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientData {
                pair: "mean_polarity_vs_daily_return".to_string(),
                observed: 2,
            }
        );

        records.push(create_test_record(3, Some(0.2), 3, Some(0.018)));
        let result = engine
            .correlate_pair("AAPL", &records, polarity_vs_return())
            .unwrap();
        assert_eq!(result.sample_size, 3);
        assert!(result.coefficient.is_finite());
        assert!((0.0..=1.0).contains(&result.p_value));
    }

    #[test]
    fn test_pairwise_complete_drops_records_per_pair() {
        let engine = CorrelationEngine::new();
        // Day 3 has no polarity but still counts for the volume pair.
        let records = vec![
            create_test_record(1, Some(0.1), 1, Some(0.010)),
            create_test_record(2, Some(0.3), 2, Some(-0.024)),
            create_test_record(3, None, 5, Some(0.040)),
            create_test_record(4, Some(0.2), 3, Some(0.018)),
        ];

        let polarity = engine
            .correlate_pair("AAPL", &records, polarity_vs_return())
            .unwrap();
        assert_eq!(polarity.sample_size, 3);

        let volume = engine
            .correlate_pair(
                "AAPL",
                &records,
                MetricPair::new(Metric::EventCount, Metric::AbsReturn),
            )
            .unwrap();
        assert_eq!(volume.sample_size, 4);
    }

    #[test]
    fn test_constant_series_is_zero_variance_not_nan() {
        let engine = CorrelationEngine::new();
        let records = vec![
            create_test_record(1, Some(0.5), 1, Some(0.010)),
            create_test_record(2, Some(0.5), 2, Some(-0.024)),
            create_test_record(3, Some(0.5), 3, Some(0.040)),
        ];

        let err = engine
            .correlate_pair("AAPL", &records, polarity_vs_return())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::ZeroVariance {
                pair: "mean_polarity_vs_daily_return".to_string(),
            }
        );
    }

    #[test]
    fn test_abs_return_transforms_the_series() {
        let record = create_test_record(1, Some(0.1), 1, Some(-0.02));
        assert_eq!(Metric::AbsReturn.extract(&record), Some(0.02));
        assert_eq!(Metric::DailyReturn.extract(&record), Some(-0.02));
    }

    #[test]
    fn test_correlate_keeps_per_pair_errors_separate() {
        let engine = CorrelationEngine::new();
        let records = vec![
            create_test_record(1, Some(0.5), 1, Some(0.010)),
            create_test_record(2, Some(0.5), 2, Some(-0.024)),
            create_test_record(3, Some(0.5), 3, Some(0.040)),
        ];

        let outcomes = engine.correlate("AAPL", &records, &default_pairs());
        assert_eq!(outcomes.len(), 2);
        // Constant polarity kills the first pair only.
        assert!(outcomes[0].is_err());
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in [
            Metric::MeanPolarity,
            Metric::PolarityStd,
            Metric::MeanSubjectivity,
            Metric::EventCount,
            Metric::DailyReturn,
            Metric::AbsReturn,
        ] {
            assert_eq!(Metric::from_str(metric.as_str()), Some(metric));
        }
        assert_eq!(Metric::from_str("sharpe"), None);

        let pair = MetricPair::new(Metric::EventCount, Metric::AbsReturn);
        assert_eq!(pair.label(), "event_count_vs_abs_return");
    }
}
