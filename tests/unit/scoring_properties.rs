//! Properties of the pure scoring pipeline

use test_log::test;
use pretty_assertions::assert_eq;
use stock_ranker::analysis::{
    aggregate_sentiment, rank_results, rank_symbol, recommend, super_score, RecommendationThresholds,
    BUY_THRESHOLD, NEUTRAL_THRESHOLD,
};
use stock_ranker::models::{Headline, Recommendation};

use crate::common::fakes::tagged_scorer;

const SAMPLE_HEADLINES: &[&str] = &[
    "great quarter",
    "Apple beats estimates as profits surge",
    "Shares plunge after fraud probe",
    "not good, not bad",
    "extremely excellent best great results",
    "worst terrible bankruptcy crash fears",
    "Company schedules annual meeting",
    "",
    "   ",
    "[de] great Quartal",
    "no no no never not",
    "really really really very highly successful",
];

#[test]
fn test_sentiment_is_always_in_range() {
    let scorer = tagged_scorer();
    for text in SAMPLE_HEADLINES {
        let value = scorer.score(text);
        assert!((-1.0..=1.0).contains(&value), "{:?} scored {}", text, value);
    }
}

#[test]
fn test_non_target_language_scores_zero() {
    let scorer = tagged_scorer();
    assert_eq!(scorer.score("[de] great excellent best"), 0.0);
    assert_eq!(scorer.score("[de] Die Aktie ist stark gefallen"), 0.0);
}

#[test]
fn test_empty_batch_aggregates_to_exactly_zero() {
    let value = aggregate_sentiment(&tagged_scorer(), &[]);
    assert_eq!(value, 0.0);
    assert!(value.is_sign_positive());
}

#[test]
fn test_aggregate_is_mean_of_scores() {
    let scorer = tagged_scorer();
    let batch: Vec<Headline> = SAMPLE_HEADLINES.iter().map(|t| Headline::new(*t, None)).collect();
    let expected = SAMPLE_HEADLINES.iter().map(|t| scorer.score(t)).sum::<f64>() / SAMPLE_HEADLINES.len() as f64;
    assert!((aggregate_sentiment(&scorer, &batch) - expected).abs() < 1e-12);
}

#[test]
fn test_super_score_formula_holds() {
    let techs = [-0.3, -0.01, 0.0, 0.004, 0.01, 0.2];
    let sentiments = [-1.0, -0.5, 0.0, 0.25, 1.0];
    for tech in techs {
        for sent in sentiments {
            assert_eq!(super_score(tech, sent), tech * (1.0 + sent));
        }
    }
}

#[test]
fn test_recommendation_boundaries_are_exclusive() {
    assert_eq!(BUY_THRESHOLD, 0.01);
    assert_eq!(NEUTRAL_THRESHOLD, 0.005);
    assert_eq!(recommend(0.01), Recommendation::Neutral);
    assert_eq!(recommend(0.005), Recommendation::Avoid);
    assert_eq!(recommend(0.010000001), Recommendation::Buy);
    assert_eq!(recommend(0.005000001), Recommendation::Neutral);
}

#[test]
fn test_ranking_sorts_descending() {
    let thresholds = RecommendationThresholds::default();
    let ranked = rank_results(vec![
        rank_symbol("A", 0.02, 0.0, 0, &thresholds),
        rank_symbol("B", -0.01, 0.0, 0, &thresholds),
        rank_symbol("C", 0.015, 0.0, 0, &thresholds),
    ]);
    let scores: Vec<f64> = ranked.iter().map(|r| r.super_score).collect();
    assert_eq!(scores, vec![0.02, 0.015, -0.01]);
}

#[test]
fn test_ranking_is_stable_on_ties() {
    let thresholds = RecommendationThresholds::default();
    let ranked = rank_results(vec![
        rank_symbol("FIRST", 0.012, 0.5, 0, &thresholds),
        rank_symbol("SECOND", 0.012, 0.5, 0, &thresholds),
    ]);
    let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["FIRST", "SECOND"]);
}
