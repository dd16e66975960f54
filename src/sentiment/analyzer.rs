//! Headline scorer: the trait seam plus the lexicon-backed implementation.

use super::lexicon::FinancialLexicon;
use serde::{Deserialize, Serialize};

/// Sentiment summary attached to exactly one news event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Valence in [-1, 1]: negative = bearish tone, positive = bullish.
    pub polarity: f64,
    /// Opinion-vs-fact content in [0, 1].
    pub subjectivity: f64,
    /// Token count of the scored text.
    pub word_count: usize,
}

impl SentimentScore {
    /// Score for empty or unscorable text.
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            word_count: 0,
        }
    }
}

/// Scoring seam injected into the pipeline. Implementations must be pure
/// and total: any input yields a finite score, empty text yields
/// `SentimentScore::neutral()`.
pub trait Scorer {
    fn score(&self, text: &str) -> SentimentScore;
}

/// Lexicon-backed scorer. Polarity and subjectivity are clamped means of
/// the matched word weights; text with no lexicon matches scores neutral
/// polarity while keeping its word count.
pub struct LexiconScorer {
    lexicon: FinancialLexicon,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: FinancialLexicon::new(),
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::neutral();
        }

        let hits = self.lexicon.analyze(&tokens);
        if hits.is_empty() {
            return SentimentScore {
                polarity: 0.0,
                subjectivity: 0.0,
                word_count: tokens.len(),
            };
        }

        let n = hits.len() as f64;
        let polarity = (hits.iter().map(|h| h.0).sum::<f64>() / n).clamp(-1.0, 1.0);
        let subjectivity = (hits.iter().map(|h| h.1).sum::<f64>() / n).clamp(0.0, 1.0);

        SentimentScore {
            polarity,
            subjectivity,
            word_count: tokens.len(),
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_neutral() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score(""), SentimentScore::neutral());
        assert_eq!(scorer.score("   "), SentimentScore::neutral());
    }

    #[test]
    fn test_unmatched_text_is_neutral_with_word_count() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("Company schedules quarterly conference call");
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.subjectivity, 0.0);
        assert_eq!(score.word_count, 5);
    }

    #[test]
    fn test_bullish_headline_scores_positive() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("Analyst upgrades stock after strong earnings beat");
        assert!(score.polarity > 0.0);
        assert!(score.subjectivity > 0.0);
        assert_eq!(score.word_count, 7);
    }

    #[test]
    fn test_bearish_headline_scores_negative() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("Shares plunge as company warns of losses");
        assert!(score.polarity < 0.0);
    }

    #[test]
    fn test_score_bounds_hold_under_intensifiers() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("extremely bullish extremely bullish extremely bullish");
        assert!(score.polarity <= 1.0);
        assert!(score.polarity > 0.0);
        assert!(score.subjectivity <= 1.0);
    }

    #[test]
    fn test_punctuation_tokenization() {
        let scorer = LexiconScorer::new();
        // "U.S. stocks rally, tech gains!" -> u, s, stocks, rally, tech, gains
        let score = scorer.score("U.S. stocks rally, tech gains!");
        assert_eq!(score.word_count, 6);
        assert!(score.polarity > 0.0);
    }
}
