//! Technical indicator series over daily closes.
//!
//! Every series is index-aligned with its input: position `i` of the
//! output describes bar `i`, and positions inside an indicator's
//! warm-up window stay `None` instead of carrying a padded value.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::PriceBar;
use crate::stats;

pub const SMA_SHORT: usize = 10;
pub const SMA_LONG: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const VOLATILITY_WINDOW: usize = 20;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple moving average, defined once `period` closes are available.
pub fn sma_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let mut window_sum: f64 = closes[..period].iter().sum();
    out[period - 1] = Some(window_sum / period as f64);
    for i in period..closes.len() {
        window_sum += closes[i] - closes[i - period];
        out[i] = Some(window_sum / period as f64);
    }
    out
}

/// Exponential moving average seeded with the SMA of the first `period`
/// closes, then smoothed with alpha = 2 / (period + 1).
pub fn ema_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);
    for i in period..closes.len() {
        ema = alpha * closes[i] + (1.0 - alpha) * ema;
        out[i] = Some(ema);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Relative strength index with Wilder smoothing.
///
/// The first value appears at index `period` (one change per bar, so
/// `period` changes need `period + 1` bars).
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

/// MACD line, signal line and histogram, all index-aligned.
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Standard 12/26/9 MACD. The line starts once the slow EMA exists; the
/// signal starts nine MACD values after that.
pub fn macd_series(closes: &[f64]) -> MacdSeries {
    let fast = ema_series(closes, MACD_FAST);
    let slow = ema_series(closes, MACD_SLOW);

    let mut macd: Vec<Option<f64>> = vec![None; closes.len()];
    for i in 0..closes.len() {
        if let (Some(f), Some(s)) = (fast[i], slow[i]) {
            macd[i] = Some(f - s);
        }
    }

    let mut signal = vec![None; closes.len()];
    let mut histogram = vec![None; closes.len()];
    let start = MACD_SLOW - 1;
    if closes.len() > start {
        // The MACD line is contiguous from `start`, so the signal EMA can
        // run over it as a plain series and be placed back at an offset.
        let macd_values: Vec<f64> = macd[start..].iter().filter_map(|v| *v).collect();
        let signal_tail = ema_series(&macd_values, MACD_SIGNAL);
        for (offset, value) in signal_tail.into_iter().enumerate() {
            signal[start + offset] = value;
        }
        for i in start..closes.len() {
            if let (Some(m), Some(s)) = (macd[i], signal[i]) {
                histogram[i] = Some(m - s);
            }
        }
    }

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}

/// Growth relative to the first close, `close[i] / close[0] - 1`.
/// Undefined everywhere if the base close is zero.
pub fn cumulative_return_series(closes: &[f64]) -> Vec<Option<f64>> {
    match closes.first() {
        Some(&base) if base != 0.0 => closes.iter().map(|c| Some(c / base - 1.0)).collect(),
        _ => vec![None; closes.len()],
    }
}

/// Annualized rolling volatility: sample standard deviation of daily
/// returns over `window` bars, scaled by sqrt(252).
pub fn rolling_volatility(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window < 2 || closes.len() < 2 {
        return out;
    }

    let mut returns: Vec<Option<f64>> = vec![None; closes.len()];
    for i in 1..closes.len() {
        if closes[i - 1] != 0.0 {
            returns[i] = Some(closes[i] / closes[i - 1] - 1.0);
        }
    }

    for i in window..closes.len() {
        let filled: Vec<f64> = returns[i + 1 - window..=i].iter().filter_map(|r| *r).collect();
        if filled.len() == window {
            if let Some(std) = stats::sample_std_dev(&filled) {
                out[i] = Some(std * TRADING_DAYS_PER_YEAR.sqrt());
            }
        }
    }
    out
}

/// One enriched output row per input bar.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub daily_return: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub cumulative_return: Option<f64>,
    pub volatility_20d: Option<f64>,
}

/// Compute the full indicator set for a chronological bar series.
pub fn enrich(bars: &[PriceBar]) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma_short = sma_series(&closes, SMA_SHORT);
    let sma_long = sma_series(&closes, SMA_LONG);
    let rsi = rsi_series(&closes, RSI_PERIOD);
    let macd = macd_series(&closes);
    let cumulative = cumulative_return_series(&closes);
    let volatility = rolling_volatility(&closes, VOLATILITY_WINDOW);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            date: bar.date,
            close: bar.close,
            daily_return: if i > 0 && closes[i - 1] != 0.0 {
                Some(closes[i] / closes[i - 1] - 1.0)
            } else {
                None
            },
            sma_10: sma_short[i],
            sma_20: sma_long[i],
            rsi_14: rsi[i],
            macd: macd.macd[i],
            macd_signal: macd.signal[i],
            macd_histogram: macd.histogram[i],
            cumulative_return: cumulative[i],
            volatility_20d: volatility[i],
        })
        .collect()
}
