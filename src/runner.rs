//! Universe runner
//!
//! Scores every symbol of a universe using a bounded pool of workers that
//! pull symbols from a shared queue. Each symbol moves through
//! Fetching -> Scoring -> Scored | Skipped on its own; nothing that happens
//! to one symbol can stop the others. Results are put back into universe
//! order before the final stable sort, so the ranking does not depend on
//! which worker finished first.

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{
    analysis::{
        aggregate_sentiment, rank_by, rank_symbol, technical_score, LanguageDetector,
        RecommendationThresholds, SentimentScorer,
    },
    api::{NewsProvider, PriceProvider},
    models::{
        Config, HeadlineBatch, PriceSeries, RankedResult, RunReport, SkipReason, SkippedSymbol,
        SymbolOutcome,
    },
};

/// Configuration for a ranking run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub period: String,
    pub interval: String,
    pub page_size: usize,
    pub news_language: String,
    pub num_workers: usize,
    /// Per-fetch timeout; `None` waits as long as the provider does
    pub fetch_timeout: Option<Duration>,
    pub thresholds: RecommendationThresholds,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RunConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            period: config.price_period.clone(),
            interval: config.price_interval.clone(),
            page_size: config.headline_page_size,
            news_language: config.news_language.clone(),
            num_workers: config.num_workers.max(1),
            fetch_timeout: Some(config.fetch_timeout).filter(|t| !t.is_zero()),
            thresholds: RecommendationThresholds::default(),
        }
    }
}

/// Where a symbol currently is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    Fetching,
    Scoring,
    Scored,
    Skipped,
}

/// Outcome of one symbol together with the series it was scored on
#[derive(Debug, Clone)]
pub struct SymbolRun {
    pub outcome: SymbolOutcome,
    pub series: Option<PriceSeries>,
}

impl SymbolRun {
    fn skipped(symbol: &str, reason: SkipReason) -> Self {
        Self {
            outcome: SymbolOutcome::Skipped {
                symbol: symbol.to_string(),
                reason,
            },
            series: None,
        }
    }

    pub fn state(&self) -> SymbolState {
        match self.outcome {
            SymbolOutcome::Scored(_) => SymbolState::Scored,
            SymbolOutcome::Skipped { .. } => SymbolState::Skipped,
        }
    }
}

/// Runs the scoring pipeline across a universe of symbols
pub struct UniverseRunner<D: LanguageDetector> {
    prices: Arc<dyn PriceProvider>,
    news: Arc<dyn NewsProvider>,
    scorer: Arc<SentimentScorer<D>>,
    config: RunConfig,
}

impl<D: LanguageDetector> Clone for UniverseRunner<D> {
    fn clone(&self) -> Self {
        Self {
            prices: Arc::clone(&self.prices),
            news: Arc::clone(&self.news),
            scorer: Arc::clone(&self.scorer),
            config: self.config.clone(),
        }
    }
}

async fn with_timeout<T, F>(timeout: Option<Duration>, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| anyhow!("{} timed out after {:?}", what, limit))?,
        None => fut.await,
    }
}

impl<D: LanguageDetector + 'static> UniverseRunner<D> {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        news: Arc<dyn NewsProvider>,
        scorer: SentimentScorer<D>,
        config: RunConfig,
    ) -> Self {
        Self {
            prices,
            news,
            scorer: Arc::new(scorer),
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fetch and score one symbol; never fails, failures become `Skipped`
    pub async fn score_symbol(&self, symbol: &str) -> SymbolRun {
        debug!("{}: {:?}", symbol, SymbolState::Fetching);
        // Queueing for the request budget is not part of the fetch timeout
        self.prices.throttle().await;
        let fetched = with_timeout(
            self.config.fetch_timeout,
            "price fetch",
            self.prices
                .get_prices(symbol, &self.config.period, &self.config.interval),
        )
        .await;

        let series = match fetched {
            Ok(series) => series,
            Err(e) => {
                return SymbolRun::skipped(
                    symbol,
                    SkipReason::ProviderUnavailable {
                        detail: e.to_string(),
                    },
                )
            }
        };

        if !series.is_usable() {
            return SymbolRun::skipped(
                symbol,
                SkipReason::InsufficientData {
                    points: series.len(),
                },
            );
        }

        debug!("{}: {:?}", symbol, SymbolState::Scoring);
        let technical = match technical_score(&series) {
            Ok(score) => score,
            Err(e) => {
                return SymbolRun::skipped(
                    symbol,
                    SkipReason::DegenerateSeries {
                        detail: e.to_string(),
                    },
                )
            }
        };

        let headlines = self.fetch_headlines(symbol).await;
        let sentiment = aggregate_sentiment(&self.scorer, &headlines);
        let result = rank_symbol(
            symbol,
            technical,
            sentiment,
            headlines.len(),
            &self.config.thresholds,
        );

        debug!(
            "{}: {:?} super={:.5} tech={:.5} sentiment={:.3} -> {:?}",
            symbol,
            SymbolState::Scored,
            result.super_score,
            result.technical_score,
            result.sentiment,
            result.recommendation
        );

        SymbolRun {
            outcome: SymbolOutcome::Scored(result),
            series: Some(series),
        }
    }

    /// Headlines for a symbol; provider failures degrade to an empty batch
    async fn fetch_headlines(&self, symbol: &str) -> HeadlineBatch {
        if self.config.page_size == 0 {
            return Vec::new();
        }
        self.news.throttle().await;
        let fetched = with_timeout(
            self.config.fetch_timeout,
            "news fetch",
            self.news
                .get_headlines(symbol, self.config.page_size, &self.config.news_language),
        )
        .await;

        match fetched {
            Ok(headlines) => headlines,
            Err(e) => {
                warn!("⚠️ {}: news unavailable, using neutral sentiment: {}", symbol, e);
                Vec::new()
            }
        }
    }

    /// Score the whole universe and return the ranked report
    pub async fn run(&self, universe: &[String]) -> RunReport {
        let total = universe.len();
        let workers = self.config.num_workers.max(1).min(total.max(1));
        info!("🚀 Ranking {} symbols with {} workers", total, workers);

        let queue: VecDeque<(usize, String)> = universe.iter().cloned().enumerate().collect();
        let queue = Arc::new(Mutex::new(queue));
        let finished: Arc<Mutex<Vec<(usize, SymbolRun)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(total)));

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let runner = self.clone();
            let queue = Arc::clone(&queue);
            let finished = Arc::clone(&finished);
            handles.push(tokio::spawn(async move {
                runner.worker(worker_id, queue, finished).await
            }));
        }

        for handle in futures::future::join_all(handles).await {
            if let Err(e) = handle {
                error!("❌ Worker stopped unexpectedly: {}", e);
            }
        }

        let mut finished = std::mem::take(&mut *finished.lock().unwrap_or_else(|p| p.into_inner()));
        finished.sort_by_key(|(index, _)| *index);

        let report = build_report(total, finished.into_iter().map(|(_, run)| run));
        info!(
            "✅ Ranking completed: {} scored, {} skipped of {}",
            report.scored_count(),
            report.skipped_count(),
            report.total_symbols
        );
        report
    }

    async fn worker(
        &self,
        worker_id: usize,
        queue: Arc<Mutex<VecDeque<(usize, String)>>>,
        finished: Arc<Mutex<Vec<(usize, SymbolRun)>>>,
    ) {
        loop {
            // Get next symbol from queue
            let next = queue.lock().unwrap_or_else(|p| p.into_inner()).pop_front();
            let Some((index, symbol)) = next else {
                break;
            };

            debug!("Worker {}: starting {}", worker_id, symbol);

            // A panic while scoring only costs this symbol
            let runner = self.clone();
            let task_symbol = symbol.clone();
            let run = match tokio::spawn(async move { runner.score_symbol(&task_symbol).await }).await {
                Ok(run) => run,
                Err(e) => SymbolRun::skipped(
                    &symbol,
                    SkipReason::DegenerateSeries {
                        detail: format!("scoring task failed: {}", e),
                    },
                ),
            };

            if let SymbolOutcome::Skipped { reason, .. } = &run.outcome {
                warn!("⚠️ Worker {}: skipping {} - {}", worker_id, symbol, reason);
            }

            finished
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push((index, run));
        }
    }
}

/// Assemble a report from symbol runs given in universe order
pub fn build_report<I>(total_symbols: usize, runs: I) -> RunReport
where
    I: IntoIterator<Item = SymbolRun>,
{
    let mut scored: Vec<(RankedResult, PriceSeries)> = Vec::new();
    let mut skipped = Vec::new();

    for run in runs {
        match (run.outcome, run.series) {
            (SymbolOutcome::Scored(result), Some(series)) => scored.push((result, series)),
            (SymbolOutcome::Scored(result), None) => {
                let series = PriceSeries::empty(result.symbol.clone());
                scored.push((result, series));
            }
            (SymbolOutcome::Skipped { symbol, reason }, _) => {
                skipped.push(SkippedSymbol { symbol, reason })
            }
        }
    }

    let (results, series): (Vec<RankedResult>, Vec<PriceSeries>) = rank_by(scored, |(result, _)| result.super_score)
        .into_iter()
        .unzip();

    RunReport {
        results,
        series,
        skipped,
        total_symbols,
    }
}
