//! newsflow - links financial news sentiment to stock price movement.
//!
//! Two independently-sourced daily series (dated headlines, OHLCV bars) are
//! normalized onto one calendar, collapsed into per-day sentiment and return
//! summaries, and correlated per ticker. See `pipeline` for the stage
//! breakdown and `bin/analyze` for the batch entry point.

pub mod config;
pub mod data;
pub mod indicators;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod stats;
