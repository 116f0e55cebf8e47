//! Headline sentiment scoring.
//!
//! A small finance flavoured polarity lexicon. Each matched word contributes
//! its weight; an intensifier directly in front scales it and a negation
//! directly in front flips it at half strength. The headline polarity is the
//! mean contribution clamped to [-1, 1].

use std::collections::HashMap;

use super::language::{LanguageDetector, LanguageFilter, WhatlangDetector};

/// Neutral polarity, also used for anything that cannot be scored
pub const NEUTRAL_SENTIMENT: f64 = 0.0;

const NEGATION_FACTOR: f64 = -0.5;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("great", 0.8),
    ("excellent", 1.0),
    ("best", 1.0),
    ("good", 0.7),
    ("strong", 0.45),
    ("stronger", 0.5),
    ("bullish", 0.8),
    ("beat", 0.5),
    ("beats", 0.5),
    ("record", 0.3),
    ("gain", 0.5),
    ("gains", 0.5),
    ("growth", 0.5),
    ("grow", 0.4),
    ("surge", 0.6),
    ("surges", 0.6),
    ("soar", 0.7),
    ("soars", 0.7),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("jump", 0.4),
    ("jumps", 0.4),
    ("rise", 0.4),
    ("rises", 0.4),
    ("higher", 0.25),
    ("profit", 0.5),
    ("profits", 0.5),
    ("profitable", 0.6),
    ("upgrade", 0.5),
    ("upgraded", 0.5),
    ("outperform", 0.6),
    ("positive", 0.25),
    ("optimistic", 0.6),
    ("boost", 0.5),
    ("boosts", 0.5),
    ("win", 0.8),
    ("wins", 0.8),
    ("success", 0.7),
    ("successful", 0.75),
    ("innovative", 0.5),
    ("impressive", 0.9),
    ("breakthrough", 0.7),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("terrible", -1.0),
    ("worst", -1.0),
    ("poor", -0.4),
    ("weak", -0.4),
    ("weaker", -0.45),
    ("bearish", -0.8),
    ("miss", -0.4),
    ("misses", -0.4),
    ("loss", -0.5),
    ("losses", -0.5),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("crash", -0.8),
    ("crashes", -0.8),
    ("fall", -0.4),
    ("falls", -0.4),
    ("drop", -0.4),
    ("drops", -0.4),
    ("decline", -0.4),
    ("declines", -0.4),
    ("slump", -0.6),
    ("slumps", -0.6),
    ("lower", -0.25),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("lawsuit", -0.4),
    ("fraud", -0.9),
    ("scandal", -0.8),
    ("probe", -0.3),
    ("recall", -0.3),
    ("layoffs", -0.5),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("warning", -0.5),
    ("warns", -0.5),
    ("fear", -0.6),
    ("fears", -0.6),
    ("risk", -0.2),
    ("negative", -0.3),
    ("disappointing", -0.6),
    ("bankruptcy", -0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("highly", 1.3),
    ("extremely", 1.5),
    ("hugely", 1.5),
    ("sharply", 1.4),
    ("massive", 1.4),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
    "won't", "can't", "cannot", "without",
];

/// Word level polarity model
#[derive(Debug, Clone)]
pub struct Lexicon {
    polarity: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    pub fn new() -> Self {
        let polarity = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS.iter())
            .map(|(word, weight)| (word.to_string(), *weight))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(word, factor)| (word.to_string(), *factor))
            .collect();
        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();

        Self {
            polarity,
            intensifiers,
            negations,
        }
    }

    /// Add or replace a word weight; weights are clamped to [-1, 1]
    pub fn with_word(mut self, word: &str, weight: f64) -> Self {
        self.polarity.insert(word.to_lowercase(), weight.clamp(-1.0, 1.0));
        self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|token| token.trim_matches('\''))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Mean polarity of matched words, 0.0 when nothing matches
    pub fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut hits = 0usize;
        let mut negated = false;
        let mut intensity = 1.0;

        for token in Self::tokenize(text) {
            if self.negations.contains(&token) {
                negated = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(&token) {
                intensity *= factor;
                continue;
            }
            if let Some(&weight) = self.polarity.get(&token) {
                let mut value = (weight * intensity).clamp(-1.0, 1.0);
                if negated {
                    value *= NEGATION_FACTOR;
                }
                total += value;
                hits += 1;
            }
            // Modifiers only reach the word right after them
            negated = false;
            intensity = 1.0;
        }

        if hits == 0 {
            return NEUTRAL_SENTIMENT;
        }
        (total / hits as f64).clamp(-1.0, 1.0)
    }
}

/// Maps a headline to a polarity in [-1, 1], zero for anything unscoreable
pub struct SentimentScorer<D = WhatlangDetector> {
    filter: LanguageFilter<D>,
    lexicon: Lexicon,
}

impl Default for SentimentScorer<WhatlangDetector> {
    fn default() -> Self {
        Self::new(LanguageFilter::english(), Lexicon::new())
    }
}

impl<D: LanguageDetector> SentimentScorer<D> {
    pub fn new(filter: LanguageFilter<D>, lexicon: Lexicon) -> Self {
        Self { filter, lexicon }
    }

    pub fn filter(&self) -> &LanguageFilter<D> {
        &self.filter
    }

    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() || !self.filter.is_target_language(text) {
            return NEUTRAL_SENTIMENT;
        }
        let value = self.lexicon.polarity(text);
        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            NEUTRAL_SENTIMENT
        }
    }
}
