use crate::models::Headline;

use super::language::LanguageDetector;
use super::sentiment::{SentimentScorer, NEUTRAL_SENTIMENT};

/// Mean headline sentiment for one symbol; an empty batch is exactly 0.0
pub fn aggregate_sentiment<D: LanguageDetector>(scorer: &SentimentScorer<D>, batch: &[Headline]) -> f64 {
    // `Sum for f64` starts at -0.0, so fold from a positive zero
    let total = batch
        .iter()
        .fold(NEUTRAL_SENTIMENT, |acc, headline| acc + scorer.score(&headline.text));
    total / batch.len().max(1) as f64
}
