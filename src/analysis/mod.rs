//! Pure scoring pipeline: no I/O happens below this module.

pub mod language;
pub mod news;
pub mod ranking;
pub mod sentiment;
pub mod technical;

pub use language::{LanguageDetector, LanguageFilter, LanguageResult, WhatlangDetector};
pub use news::aggregate_sentiment;
pub use ranking::{
    rank_by, rank_results, rank_symbol, recommend, super_score, RecommendationThresholds, BUY_THRESHOLD,
    NEUTRAL_THRESHOLD,
};
pub use sentiment::{Lexicon, SentimentScorer};
pub use technical::technical_score;
