//! External data collaborators: CSV loaders for news events and price bars.
//!
//! The pipeline consumes these records read-only; all file-layout and
//! parsing concerns stay on this side of the boundary.

pub mod news;
pub mod prices;

pub use news::{load_news, NewsEvent};
pub use prices::{daily_returns, CsvPriceSource, PriceBar, PriceSource};
