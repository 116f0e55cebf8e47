//! Combination of the technical and sentiment signals into a ranking.

use crate::models::{RankedResult, Recommendation};

/// Super-scores strictly above this are a buy
pub const BUY_THRESHOLD: f64 = 0.01;
/// Super-scores strictly above this (and up to the buy threshold) are neutral
pub const NEUTRAL_THRESHOLD: f64 = 0.005;

/// Cut-offs used to map a super-score to a recommendation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationThresholds {
    pub buy: f64,
    pub neutral: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            buy: BUY_THRESHOLD,
            neutral: NEUTRAL_THRESHOLD,
        }
    }
}

impl RecommendationThresholds {
    pub fn recommend(&self, score: f64) -> Recommendation {
        if score > self.buy {
            Recommendation::Buy
        } else if score > self.neutral {
            Recommendation::Neutral
        } else {
            Recommendation::Avoid
        }
    }
}

/// Technical score scaled by `1 + sentiment`.
///
/// Positive sentiment amplifies a negative technical score as well; this is
/// left unclamped.
pub fn super_score(technical: f64, sentiment: f64) -> f64 {
    technical * (1.0 + sentiment)
}

/// Recommendation under the default thresholds
pub fn recommend(score: f64) -> Recommendation {
    RecommendationThresholds::default().recommend(score)
}

/// Build the result record for one symbol
pub fn rank_symbol(
    symbol: &str,
    technical: f64,
    sentiment: f64,
    headline_count: usize,
    thresholds: &RecommendationThresholds,
) -> RankedResult {
    let score = super_score(technical, sentiment);
    RankedResult {
        symbol: symbol.to_string(),
        super_score: score,
        technical_score: technical,
        sentiment,
        recommendation: thresholds.recommend(score),
        headline_count,
    }
}

/// Sort by super-score descending; ties keep their incoming order.
///
/// Non-finite scores are dropped before sorting.
pub fn rank_results(results: Vec<RankedResult>) -> Vec<RankedResult> {
    rank_by(results, |r| r.super_score)
}

/// Stable descending sort of arbitrary items by a score, dropping non-finite scores
pub fn rank_by<T, F>(mut items: Vec<T>, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.retain(|item| score(item).is_finite());
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
    items
}
