//! Daily OHLCV bars, close-to-close returns, and the per-ticker CSV source.

use crate::pipeline::date_norm;
use crate::pipeline::PipelineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One trading day for one ticker. `date` is already day-resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Close-to-close fractional return keyed by trading date.
///
/// The first bar has no predecessor, so its entry is `None` rather than
/// zero. A zero previous close also yields `None` (the ratio is undefined).
pub fn daily_returns(bars: &[PriceBar]) -> BTreeMap<NaiveDate, Option<f64>> {
    let mut returns = BTreeMap::new();
    for (i, bar) in bars.iter().enumerate() {
        let value = if i == 0 {
            None
        } else {
            let prev_close = bars[i - 1].close;
            if prev_close != 0.0 {
                Some((bar.close - prev_close) / prev_close)
            } else {
                None
            }
        };
        returns.insert(bar.date, value);
    }
    returns
}

/// Per-ticker bar source. The trait is the batch runner's seam, so tests
/// can substitute an in-memory source.
pub trait PriceSource {
    fn load(&self, ticker: &str) -> Result<Vec<PriceBar>, PipelineError>;
}

/// Reads `{TICKER}_historical_data.csv` files from one directory.
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn ticker_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}_historical_data.csv", ticker))
    }
}

impl PriceSource for CsvPriceSource {
    /// Columns located by header name: `Date`, `Open`, `High`, `Low`,
    /// `Close`, `Volume` (an `Adj Close` column, when present, is ignored).
    /// Rows with unparsable dates or non-numeric fields are dropped with a
    /// warning; bars come back sorted ascending by date. A missing file or
    /// a file with no usable rows is `SourceUnavailable`.
    fn load(&self, ticker: &str) -> Result<Vec<PriceBar>, PipelineError> {
        let path = self.ticker_path(ticker);
        let source = path.display().to_string();

        if !path.exists() {
            return Err(PipelineError::SourceUnavailable {
                source,
                reason: format!("no price file for {}", ticker),
            });
        }

        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| PipelineError::SourceUnavailable {
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

        let date_col = column("date").ok_or_else(|| missing("Date"))?;
        let open_col = column("open").ok_or_else(|| missing("Open"))?;
        let high_col = column("high").ok_or_else(|| missing("High"))?;
        let low_col = column("low").ok_or_else(|| missing("Low"))?;
        let close_col = column("close").ok_or_else(|| missing("Close"))?;
        let volume_col = column("volume").ok_or_else(|| missing("Volume"))?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };

            let field = |col: usize| record.get(col).unwrap_or("").trim();
            let date = date_norm::normalize(field(date_col)).ok();
            let open = field(open_col).parse::<f64>().ok();
            let high = field(high_col).parse::<f64>().ok();
            let low = field(low_col).parse::<f64>().ok();
            let close = field(close_col).parse::<f64>().ok();
            let volume = field(volume_col).parse::<f64>().ok();

            match (date, open, high, low, close, volume) {
                (Some(date), Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                    bars.push(PriceBar {
                        date,
                        open,
                        high,
                        low,
                        close,
                        volume,
                    });
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            log::warn!("{}: dropped {} unparsable price rows", ticker, dropped);
        }

        if bars.is_empty() {
            return Err(PipelineError::SourceUnavailable {
                source,
                reason: format!("no usable price rows for {}", ticker),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
