//! Analyze Binary - News Sentiment / Price Correlation
//!
//! Scores financial news headlines, aligns them with daily stock returns,
//! and writes one correlation row per (ticker, metric pair).
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin analyze
//! cargo run --release --bin analyze -- --backend sqlite
//! ```
//!
//! ## Environment Variables
//!
//! - NEWSFLOW_NEWS_PATH - News CSV path (default: data/raw_analyst_ratings.csv)
//! - NEWSFLOW_PRICE_DIR - Directory of {TICKER}_historical_data.csv files (default: data/prices)
//! - NEWSFLOW_REPORT_PATH - Report CSV path (default: data/correlations.csv) - used when --backend csv
//! - NEWSFLOW_DB_PATH - SQLite database path (default: data/newsflow.db) - used when --backend sqlite
//! - NEWSFLOW_TICKERS - Comma-separated ticker universe (default: every ticker in the news file)
//! - NEWSFLOW_JOIN_POLICY - strict | calendar-filled (default: strict)
//! - NEWSFLOW_METRIC_PAIRS - Pairs as x:y (default: mean_polarity:daily_return,event_count:abs_return)
//! - NEWSFLOW_MAX_FAILURES - Stop issuing work after this many failed tickers (default: unlimited)
//! - RUST_LOG - Logging level (optional, default: info)

use std::collections::BTreeSet;

use newsflow::config::AnalyzeConfig;
use newsflow::data::{load_news, CsvPriceSource};
use newsflow::pipeline::{score_events, BatchRunner};
use newsflow::report::ReportWriter;
use newsflow::sentiment::LexiconScorer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = AnalyzeConfig::from_env()?;

    let pair_labels: Vec<String> = config.metric_pairs.iter().map(|p| p.label()).collect();
    log::info!("🚀 Starting News/Price Correlation Analysis");
    log::info!("   News file: {}", config.news_path.display());
    log::info!("   Price directory: {}", config.price_dir.display());
    log::info!("   Report: {}", config.report_path.display());
    log::info!("   Join policy: {}", config.join_policy.as_str());
    log::info!("   Metric pairs: {}", pair_labels.join(", "));
    if let Some(limit) = config.max_failures {
        log::info!("   Failure limit: {}", limit);
    }

    let events = load_news(&config.news_path)?;
    log::info!("📥 Loaded {} news events", events.len());

    let scorer = LexiconScorer::new();
    let (scored, dropped) = score_events(&events, &scorer);
    if dropped > 0 {
        log::warn!("⚠️ Dropped {} events with malformed timestamps", dropped);
    }
    log::info!("📝 Scored {} events", scored.len());

    let tickers: Vec<String> = match &config.tickers {
        Some(tickers) => tickers.clone(),
        None => {
            let distinct: BTreeSet<String> = scored.iter().map(|e| e.ticker.clone()).collect();
            distinct.into_iter().collect()
        }
    };
    log::info!("🎯 Ticker universe: {} tickers", tickers.len());

    let prices = CsvPriceSource::new(config.price_dir.clone());
    let runner = BatchRunner::new(
        config.join_policy,
        config.metric_pairs.clone(),
        config.max_failures,
    );

    log::info!("⏱️  Running batch correlation...");
    let outcome = runner.run(&scored, &prices, &tickers);
    log::info!(
        "✅ Batch complete: {} results, {} failures, {} excluded daily rows",
        outcome.results.len(),
        outcome.failures.len(),
        outcome.excluded_rows
    );

    let mut writer = ReportWriter::new(config.backend.clone(), config.report_path.clone())?;
    log::info!("📊 Backend: {}", writer.backend_type());

    for result in &outcome.results {
        writer.write_result(result).await?;
    }
    for failure in &outcome.failures {
        writer.write_failure(failure).await?;
    }
    writer.flush().await?;

    log::info!("📝 Report written to: {}", config.report_path.display());

    Ok(())
}
