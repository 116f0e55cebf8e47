pub mod analysis;
pub mod api;
pub mod error;
pub mod models;
pub mod runner;
pub mod ui;
pub mod universe;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use whatlang::Lang;

use crate::analysis::{LanguageFilter, Lexicon, SentimentScorer, WhatlangDetector};
use crate::api::{NewsApiClient, NewsApiConfig, NewsProvider, NoNewsProvider, YahooClient};
use crate::models::Config;
use crate::runner::{RunConfig, UniverseRunner};

/// Sentiment scorer for the configured target language
pub fn build_scorer(config: &Config) -> Result<SentimentScorer<WhatlangDetector>> {
    let target = Lang::from_code(&config.target_language)
        .with_context(|| format!("unknown target language '{}'", config.target_language))?;
    Ok(SentimentScorer::new(
        LanguageFilter::new(WhatlangDetector::new(), target),
        Lexicon::new(),
    ))
}

/// Wire the HTTP providers and scorer described by `config` into a runner
pub fn build_runner(config: &Config) -> Result<UniverseRunner<WhatlangDetector>> {
    let prices = Arc::new(YahooClient::new(config)?);

    let news: Arc<dyn NewsProvider> = match NewsApiConfig::from_config(config) {
        Some(news_config) => Arc::new(NewsApiClient::new(news_config)?),
        None => {
            warn!("⚠️ NEWS_API_KEY not set, every symbol gets neutral sentiment");
            Arc::new(NoNewsProvider)
        }
    };

    let run_config = RunConfig::from_config(config);
    info!(
        "📋 Period {} / interval {}, {} headlines per symbol",
        run_config.period, run_config.interval, run_config.page_size
    );

    Ok(UniverseRunner::new(prices, news, build_scorer(config)?, run_config))
}
