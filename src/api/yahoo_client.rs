use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::models::{Config, PricePoint, PriceSeries};
use super::{ApiRateLimiter, PriceProvider, USER_AGENT};

/// Chart endpoint response envelope
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
}

#[derive(Debug, Deserialize)]
struct QuoteIndicator {
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance chart API client
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl YahooClient {
    /// Create a new Yahoo client
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if !config.fetch_timeout.is_zero() {
            builder = builder.timeout(config.fetch_timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.price_api_base_url.clone(),
            rate_limiter: ApiRateLimiter::new(config.rate_limit_per_minute),
        })
    }

    fn chart_url(&self, symbol: &str, period: &str, interval: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid price API base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("price API base URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", period)
            .append_pair("interval", interval);
        Ok(url)
    }
}

/// Turn a chart payload into a series, dropping null closes and out of order bars
fn series_from_chart(symbol: &str, response: ChartResponse) -> Result<PriceSeries> {
    if let Some(error) = response.chart.error {
        return Err(anyhow!(
            "chart error for {}: {} {}",
            symbol,
            error.code.unwrap_or_default(),
            error.description.unwrap_or_default()
        ));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let (Some(close), Some(timestamp)) = (close, DateTime::<Utc>::from_timestamp(ts, 0)) else {
            continue;
        };
        if !close.is_finite() {
            continue;
        }
        if points.last().is_some_and(|last| last.timestamp >= timestamp) {
            continue;
        }
        points.push(PricePoint::new(timestamp, close));
    }

    Ok(PriceSeries::new(symbol, points)?)
}

#[async_trait::async_trait]
impl PriceProvider for YahooClient {
    async fn throttle(&self) {
        self.rate_limiter.wait().await;
    }

    async fn get_prices(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, period, interval)?;
        debug!("Making request to: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("chart request for {} failed with status {}: {}", symbol, status, error_text));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .with_context(|| format!("malformed chart payload for {}", symbol))?;
        let series = series_from_chart(symbol, payload)?;

        debug!("Retrieved {} closes for {} ({} / {})", series.len(), symbol, period, interval);
        Ok(series)
    }
}
