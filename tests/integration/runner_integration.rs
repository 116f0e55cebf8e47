//! Universe runs against in-memory providers

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use test_log::test;

use stock_ranker::analysis::{recommend, technical_score};
use stock_ranker::models::{Recommendation, SkipReason};
use stock_ranker::runner::{RunConfig, UniverseRunner};

use crate::common::fakes::{tagged_scorer, FakeNewsProvider, FakePriceProvider, PriceFixture, TaggedDetector};
use crate::common::logging::{log_test_data, log_test_step};
use crate::common::test_data::{create_test_series, symbols, REFERENCE_CLOSES};

fn runner_with(
    prices: Arc<FakePriceProvider>,
    news: Arc<FakeNewsProvider>,
    config: RunConfig,
) -> UniverseRunner<TaggedDetector> {
    UniverseRunner::new(prices, news, tagged_scorer(), config)
}

#[test(tokio::test)]
async fn test_reference_symbol_end_to_end() {
    log_test_step("Scoring the reference series with one positive headline");
    let prices = Arc::new(FakePriceProvider::new().with_closes("AAPL", &REFERENCE_CLOSES));
    let news = Arc::new(FakeNewsProvider::new().with("AAPL", &["great quarter"]));
    let runner = runner_with(prices, news.clone(), RunConfig::default());

    let report = runner.run(&symbols(&["AAPL"])).await;
    log_test_data("report", &report.results);

    assert_eq!(report.scored_count(), 1);
    let result = &report.results[0];
    let expected_tech = technical_score(&create_test_series("AAPL", &REFERENCE_CLOSES)).unwrap();

    assert_eq!(result.symbol, "AAPL");
    assert_eq!(result.technical_score, expected_tech);
    assert_eq!(result.sentiment, 0.8);
    assert!((result.super_score - expected_tech * 1.8).abs() < 1e-12);
    assert!(result.super_score > result.technical_score);
    assert_eq!(result.recommendation, recommend(result.super_score));
    assert_eq!(result.recommendation, Recommendation::Buy);
    assert_eq!(report.series_for("AAPL").map(|s| s.len()), Some(6));

    assert_eq!(news.calls(), vec![("AAPL".to_string(), 5, "en".to_string())]);
}

#[test(tokio::test)]
async fn test_order_is_independent_of_completion_order() {
    log_test_step("Tied symbols keep universe order even when the first finishes last");
    let prices = Arc::new(
        FakePriceProvider::new()
            .with(
                "SLOW",
                PriceFixture::Slow(Duration::from_millis(100), REFERENCE_CLOSES.to_vec()),
            )
            .with_closes("B", &REFERENCE_CLOSES)
            .with_closes("C", &REFERENCE_CLOSES)
            .with_closes("D", &REFERENCE_CLOSES),
    );
    let news = Arc::new(FakeNewsProvider::new());
    let config = RunConfig {
        num_workers: 4,
        ..RunConfig::default()
    };

    let report = runner_with(prices, news, config)
        .run(&symbols(&["SLOW", "B", "C", "D"]))
        .await;

    let ranked: Vec<&str> = report.results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(ranked, vec!["SLOW", "B", "C", "D"]);
    let series: Vec<&str> = report.series.iter().map(|s| s.symbol()).collect();
    assert_eq!(series, ranked);
}

#[test(tokio::test)]
async fn test_failures_are_isolated_per_symbol() {
    log_test_step("Every kind of failure skips only its own symbol");
    let prices = Arc::new(
        FakePriceProvider::new()
            .with_closes("GOOD", &REFERENCE_CLOSES)
            .with("DOWN", PriceFixture::Fail("503 from upstream".to_string()))
            .with(
                "HANG",
                PriceFixture::Slow(Duration::from_secs(5), REFERENCE_CLOSES.to_vec()),
            )
            .with("BOOM", PriceFixture::Panic)
            .with_closes("SHORT", &[10.0, 11.0, 12.0, 13.0, 14.0])
            .with_closes("ZERO", &[5.0, 0.0, 1.0, 2.0, 3.0, 4.0]),
    );
    let news = Arc::new(FakeNewsProvider::new());
    let config = RunConfig {
        num_workers: 3,
        fetch_timeout: Some(Duration::from_millis(50)),
        ..RunConfig::default()
    };

    let universe = symbols(&["DOWN", "HANG", "GOOD", "BOOM", "SHORT", "ZERO", "MISSING"]);
    let report = runner_with(prices, news, config).run(&universe).await;
    log_test_data("skipped", &report.skipped);

    assert_eq!(report.total_symbols, 7);
    assert_eq!(report.scored_count(), 1);
    assert_eq!(report.results[0].symbol, "GOOD");

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(skipped, vec!["DOWN", "HANG", "BOOM", "SHORT", "ZERO", "MISSING"]);

    assert_matches!(&report.skipped[0].reason, SkipReason::ProviderUnavailable { detail } if detail.contains("503"));
    assert_matches!(&report.skipped[1].reason, SkipReason::ProviderUnavailable { detail } if detail.contains("timed out"));
    assert_matches!(&report.skipped[2].reason, SkipReason::DegenerateSeries { detail } if detail.contains("scoring task failed"));
    assert_matches!(report.skipped[3].reason, SkipReason::InsufficientData { points: 5 });
    assert_matches!(report.skipped[4].reason, SkipReason::DegenerateSeries { .. });
    assert_matches!(report.skipped[5].reason, SkipReason::InsufficientData { points: 0 });
}

#[test(tokio::test)]
async fn test_rate_limit_queueing_does_not_count_as_timeout() {
    log_test_step("Six healthy symbols behind a 100ms request budget and a 150ms fetch timeout");
    let universe = ["A", "B", "C", "D", "E", "F"];
    let prices = universe
        .iter()
        .fold(FakePriceProvider::new().rate_limited(600), |fake, symbol| {
            fake.with_closes(symbol, &REFERENCE_CLOSES)
        });
    let config = RunConfig {
        num_workers: 4,
        fetch_timeout: Some(Duration::from_millis(150)),
        ..RunConfig::default()
    };

    let report = runner_with(Arc::new(prices), Arc::new(FakeNewsProvider::new()), config)
        .run(&symbols(&universe))
        .await;
    log_test_data("skipped", &report.skipped);

    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.scored_count(), 6);
}

#[test(tokio::test)]
async fn test_news_failure_scores_with_neutral_sentiment() {
    let prices = Arc::new(FakePriceProvider::new().with_closes("MSFT", &REFERENCE_CLOSES));
    let news = Arc::new(FakeNewsProvider::new().failing("MSFT"));

    let report = runner_with(prices, news, RunConfig::default())
        .run(&symbols(&["MSFT"]))
        .await;

    assert_eq!(report.scored_count(), 1);
    let result = &report.results[0];
    assert_eq!(result.sentiment, 0.0);
    assert!(result.sentiment.is_sign_positive());
    assert_eq!(result.headline_count, 0);
    assert_eq!(result.super_score, result.technical_score);
}

#[test(tokio::test)]
async fn test_foreign_headlines_dilute_the_mean() {
    log_test_step("Non-target headlines count as zero but stay in the denominator");
    let prices = Arc::new(FakePriceProvider::new().with_closes("SAP", &REFERENCE_CLOSES));
    let news = Arc::new(FakeNewsProvider::new().with("SAP", &["great quarter", "[de] great Quartal"]));

    let report = runner_with(prices, news, RunConfig::default())
        .run(&symbols(&["SAP"]))
        .await;

    let result = &report.results[0];
    assert_eq!(result.headline_count, 2);
    assert!((result.sentiment - 0.4).abs() < 1e-12);
}

#[test(tokio::test)]
async fn test_duplicates_are_scored_independently() {
    let prices = Arc::new(FakePriceProvider::new().with_closes("SHOP", &REFERENCE_CLOSES));
    let news = Arc::new(FakeNewsProvider::new());

    let report = runner_with(prices.clone(), news, RunConfig::default())
        .run(&symbols(&["SHOP", "SHOP", "SHOP"]))
        .await;

    assert_eq!(report.scored_count(), 3);
    assert!(report.results.iter().all(|r| r.symbol == "SHOP"));
    assert_eq!(prices.calls().len(), 3);
}

#[test(tokio::test)]
async fn test_short_series_never_requests_news() {
    let prices = Arc::new(FakePriceProvider::new().with_closes("TINY", &[1.0, 2.0, 3.0]));
    let news = Arc::new(FakeNewsProvider::new().with("TINY", &["great quarter"]));

    let report = runner_with(prices, news.clone(), RunConfig::default())
        .run(&symbols(&["TINY"]))
        .await;

    assert_eq!(report.skipped_count(), 1);
    assert!(news.calls().is_empty());
}

#[test(tokio::test)]
async fn test_empty_universe_gives_empty_report() {
    let report = runner_with(
        Arc::new(FakePriceProvider::new()),
        Arc::new(FakeNewsProvider::new()),
        RunConfig::default(),
    )
    .run(&[])
    .await;

    assert_eq!(report.total_symbols, 0);
    assert!(report.results.is_empty());
    assert!(report.skipped.is_empty());
}
