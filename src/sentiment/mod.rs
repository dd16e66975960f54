//! Headline sentiment scoring.
//!
//! The pipeline only depends on the `Scorer` trait; the lexicon-backed
//! implementation shipped here is one collaborator behind that seam.

pub mod analyzer;
pub mod lexicon;

pub use analyzer::{LexiconScorer, Scorer, SentimentScore};
pub use lexicon::FinancialLexicon;
