//! Financial sentiment lexicon with negation and intensifier handling.

use std::collections::{HashMap, HashSet};

/// (word, polarity weight, subjectivity weight)
const WORDS: &[(&str, f64, f64)] = &[
    // bullish vocabulary
    ("upgrade", 0.6, 0.7),
    ("upgrades", 0.6, 0.7),
    ("upgraded", 0.6, 0.7),
    ("outperform", 0.5, 0.6),
    ("beat", 0.5, 0.5),
    ("beats", 0.5, 0.5),
    ("surge", 0.7, 0.6),
    ("surges", 0.7, 0.6),
    ("soar", 0.8, 0.7),
    ("soars", 0.8, 0.7),
    ("rally", 0.6, 0.6),
    ("rallies", 0.6, 0.6),
    ("gain", 0.4, 0.4),
    ("gains", 0.4, 0.4),
    ("jump", 0.5, 0.5),
    ("jumps", 0.5, 0.5),
    ("climb", 0.4, 0.4),
    ("climbs", 0.4, 0.4),
    ("record", 0.4, 0.5),
    ("high", 0.3, 0.3),
    ("highs", 0.3, 0.3),
    ("growth", 0.4, 0.4),
    ("profit", 0.4, 0.4),
    ("profits", 0.4, 0.4),
    ("bullish", 0.7, 0.8),
    ("buy", 0.4, 0.4),
    ("strong", 0.5, 0.6),
    ("strength", 0.5, 0.6),
    ("positive", 0.4, 0.6),
    ("optimistic", 0.5, 0.8),
    ("exceed", 0.5, 0.5),
    ("exceeds", 0.5, 0.5),
    ("tops", 0.5, 0.5),
    ("raises", 0.4, 0.4),
    ("momentum", 0.3, 0.5),
    ("recovery", 0.4, 0.5),
    ("rebound", 0.5, 0.5),
    ("rebounds", 0.5, 0.5),
    ("breakout", 0.5, 0.6),
    ("upside", 0.5, 0.6),
    ("approval", 0.5, 0.5),
    ("wins", 0.5, 0.5),
    ("expands", 0.3, 0.4),
    // bearish vocabulary
    ("downgrade", -0.6, 0.7),
    ("downgrades", -0.6, 0.7),
    ("downgraded", -0.6, 0.7),
    ("underperform", -0.5, 0.6),
    ("miss", -0.5, 0.5),
    ("misses", -0.5, 0.5),
    ("missed", -0.5, 0.5),
    ("plunge", -0.7, 0.6),
    ("plunges", -0.7, 0.6),
    ("crash", -0.8, 0.7),
    ("crashes", -0.8, 0.7),
    ("tumble", -0.6, 0.6),
    ("tumbles", -0.6, 0.6),
    ("slump", -0.6, 0.6),
    ("slumps", -0.6, 0.6),
    ("drop", -0.4, 0.4),
    ("drops", -0.4, 0.4),
    ("fall", -0.4, 0.4),
    ("falls", -0.4, 0.4),
    ("sink", -0.5, 0.5),
    ("sinks", -0.5, 0.5),
    ("loss", -0.5, 0.5),
    ("losses", -0.5, 0.5),
    ("low", -0.3, 0.3),
    ("lows", -0.3, 0.3),
    ("bearish", -0.7, 0.8),
    ("sell", -0.4, 0.4),
    ("selloff", -0.6, 0.6),
    ("weak", -0.5, 0.6),
    ("weakness", -0.5, 0.6),
    ("decline", -0.4, 0.4),
    ("declines", -0.4, 0.4),
    ("warning", -0.5, 0.6),
    ("warns", -0.5, 0.6),
    ("cut", -0.4, 0.4),
    ("cuts", -0.4, 0.4),
    ("lawsuit", -0.5, 0.5),
    ("probe", -0.4, 0.5),
    ("investigation", -0.4, 0.5),
    ("recall", -0.5, 0.5),
    ("bankruptcy", -0.9, 0.7),
    ("default", -0.7, 0.6),
    ("fraud", -0.8, 0.8),
    ("layoffs", -0.6, 0.6),
    ("negative", -0.4, 0.6),
    ("pessimistic", -0.5, 0.8),
    ("fears", -0.5, 0.6),
    ("concerns", -0.4, 0.6),
    ("risk", -0.3, 0.5),
    ("risks", -0.3, 0.5),
    ("volatile", -0.3, 0.6),
    ("downside", -0.5, 0.6),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "neither", "nor", "without", "cannot"];

/// (word, multiplier applied to the following sentiment word)
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("highly", 1.6),
    ("significantly", 1.8),
    ("sharply", 1.8),
    ("strongly", 1.6),
    ("massively", 2.0),
    ("slightly", 0.5),
    ("modestly", 0.7),
    ("barely", 0.4),
];

/// How far back a negation word flips a sentiment word's sign.
const NEGATION_WINDOW: usize = 3;

/// Word-level sentiment weights for financial headlines.
pub struct FinancialLexicon {
    words: HashMap<&'static str, (f64, f64)>,
    negations: HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
}

impl FinancialLexicon {
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            negations: NEGATIONS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Per-match (polarity, subjectivity) contributions for a token stream.
    ///
    /// A negation within the preceding window flips a match's sign; an
    /// intensifier immediately before a match scales its polarity. Tokens
    /// are expected lowercased.
    pub fn analyze(&self, tokens: &[String]) -> Vec<(f64, f64)> {
        let mut hits = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(polarity, subjectivity)) = self.words.get(token.as_str()) else {
                continue;
            };

            let mut polarity = polarity;

            if i > 0 {
                if let Some(&factor) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    polarity *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| self.negations.contains(t.as_str()))
            {
                polarity = -polarity;
            }

            hits.push((polarity, subjectivity));
        }

        hits
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for FinancialLexicon {
    fn default() -> Self {
        Self::new()
    }
}
