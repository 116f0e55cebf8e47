use anyhow::Result;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::models::{HeadlineBatch, PriceSeries};

pub mod newsapi_client;
pub mod yahoo_client;

pub use newsapi_client::{NewsApiClient, NewsApiConfig};
pub use yahoo_client::YahooClient;

/// User agent sent with every provider request
pub const USER_AGENT: &str = "stock-ranker/0.1";

type DirectLimiter =
    RateLimiter<governor::state::direct::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

/// Request pacing for one API, one request per `delay` with no burst
pub struct ApiRateLimiter {
    delay: Duration,
    limiter: Option<DirectLimiter>,
}

impl ApiRateLimiter {
    /// `0` requests per minute disables limiting
    pub fn new(requests_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(requests_per_minute)
            .map(|rpm| RateLimiter::direct(Quota::per_minute(rpm).allow_burst(NonZeroU32::MIN)));
        let delay = match requests_per_minute {
            0 => Duration::ZERO,
            rpm => Duration::from_millis(60_000 / rpm as u64),
        };

        Self { delay, limiter }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next request is allowed
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

/// Source of close price history for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    /// Wait for the provider's request budget.
    ///
    /// Callers pace requests with this before `get_prices`, outside any
    /// fetch timeout, so time spent queueing is never counted as slowness.
    async fn throttle(&self) {}

    /// Close prices over `period` sampled every `interval`; may be empty
    async fn get_prices(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries>;
}

/// Source of recent headlines for a query
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Wait for the provider's request budget, see `PriceProvider::throttle`
    async fn throttle(&self) {}

    /// Up to `page_size` recent headlines; may be empty
    async fn get_headlines(&self, query: &str, page_size: usize, language: &str) -> Result<HeadlineBatch>;
}

/// News provider used when no news API key is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNewsProvider;

#[async_trait::async_trait]
impl NewsProvider for NoNewsProvider {
    async fn get_headlines(&self, _query: &str, _page_size: usize, _language: &str) -> Result<HeadlineBatch> {
        Ok(Vec::new())
    }
}
