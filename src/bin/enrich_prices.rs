//! Enrich Prices Binary - Technical Indicator Export
//!
//! Loads one ticker's daily bars and writes them back out with SMA, RSI,
//! MACD, cumulative return and rolling volatility columns attached.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin enrich_prices -- --ticker AAPL
//! ```
//!
//! ## Environment Variables
//!
//! - NEWSFLOW_PRICE_DIR - Directory of {TICKER}_historical_data.csv files (default: data/prices)
//! - NEWSFLOW_ENRICHED_DIR - Output directory (default: data/enriched)
//! - RUST_LOG - Logging level (optional, default: info)

use std::fs;

use newsflow::config::EnrichConfig;
use newsflow::data::{CsvPriceSource, PriceSource};
use newsflow::indicators;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = EnrichConfig::from_env_and_args()?;

    log::info!("🚀 Enriching price history for {}", config.ticker);
    log::info!("   Price directory: {}", config.price_dir.display());
    log::info!("   Output: {}", config.output_path.display());

    let source = CsvPriceSource::new(config.price_dir.clone());
    let bars = source.load(&config.ticker)?;
    log::info!("📥 Loaded {} bars", bars.len());

    let rows = indicators::enrich(&bars);

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(&config.output_path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!(
        "✅ Wrote {} enriched rows to: {}",
        rows.len(),
        config.output_path.display()
    );

    Ok(())
}
