//! Runs the per-ticker pipeline across a ticker universe.
//!
//! Each ticker is isolated: a missing price file, an empty join or an
//! undefined correlation is recorded against that ticker and the batch
//! moves on. Failures never leak into the success table.

use log::{debug, warn};

use crate::data::PriceSource;

use super::aligner::{align, JoinPolicy};
use super::correlation::{CorrelationEngine, CorrelationResult, MetricPair};
use super::daily::aggregate;
use super::date_norm::ScoredEvent;
use super::PipelineError;

/// A pipeline error attributed to one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: PipelineError,
}

/// Everything a batch run produces: the concatenated success table, the
/// per-ticker failure list, and how many daily rows were excluded from
/// correlation across all tickers.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<CorrelationResult>,
    pub failures: Vec<TickerFailure>,
    pub excluded_rows: usize,
}

/// Drives align → aggregate → correlate for each ticker in turn.
pub struct BatchRunner {
    policy: JoinPolicy,
    pairs: Vec<MetricPair>,
    max_failures: Option<usize>,
    engine: CorrelationEngine,
}

impl BatchRunner {
    /// `max_failures` is an optional circuit breaker: once that many
    /// tickers have failed, remaining tickers are skipped. `None` runs
    /// the full universe regardless.
    pub fn new(policy: JoinPolicy, pairs: Vec<MetricPair>, max_failures: Option<usize>) -> Self {
        Self {
            policy,
            pairs,
            max_failures,
            engine: CorrelationEngine::new(),
        }
    }

    pub fn run(
        &self,
        events: &[ScoredEvent],
        prices: &dyn PriceSource,
        tickers: &[String],
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut failed_tickers = 0usize;

        for (index, ticker) in tickers.iter().enumerate() {
            if let Some(limit) = self.max_failures {
                if failed_tickers >= limit {
                    warn!(
                        "⚠️ Failure limit ({}) reached, skipping {} remaining tickers",
                        limit,
                        tickers.len() - index
                    );
                    break;
                }
            }

            let failures_before = outcome.failures.len();
            self.run_ticker(events, prices, ticker, &mut outcome);
            if outcome.failures.len() > failures_before {
                failed_tickers += 1;
            }
        }

        outcome
    }

    fn run_ticker(
        &self,
        events: &[ScoredEvent],
        prices: &dyn PriceSource,
        ticker: &str,
        outcome: &mut BatchOutcome,
    ) {
        let bars = match prices.load(ticker) {
            Ok(bars) => bars,
            Err(error) => {
                warn!("⚠️ {} skipped: {}", ticker, error);
                outcome.failures.push(TickerFailure {
                    ticker: ticker.to_string(),
                    error,
                });
                return;
            }
        };

        let aligned = align(events, &bars, ticker, self.policy);
        if aligned.is_empty() {
            let error = PipelineError::EmptyAlignment {
                ticker: ticker.to_string(),
            };
            warn!("⚠️ {} skipped: {}", ticker, error);
            outcome.failures.push(TickerFailure {
                ticker: ticker.to_string(),
                error,
            });
            return;
        }

        let table = aggregate(ticker, &aligned);
        outcome.excluded_rows += table.excluded.len();
        debug!(
            "{}: {} usable days, {} excluded",
            ticker,
            table.usable.len(),
            table.excluded.len()
        );

        for result in self.engine.correlate(ticker, &table.usable, &self.pairs) {
            match result {
                Ok(res) => outcome.results.push(res),
                Err(error) => {
                    warn!("⚠️ {} correlation failed: {}", ticker, error);
                    outcome.failures.push(TickerFailure {
                        ticker: ticker.to_string(),
                        error,
                    });
                }
            }
        }
    }
}
