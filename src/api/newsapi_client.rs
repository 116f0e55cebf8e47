use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::models::{Config, Headline, HeadlineBatch};
use super::{ApiRateLimiter, NewsProvider, USER_AGENT};

/// Credentials and endpoint for NewsAPI, handed to the client at construction
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub rate_limit_per_minute: u32,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            rate_limit_per_minute: 0,
        }
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.news_api_key.clone()?;
        Some(Self {
            api_key,
            base_url: config.news_api_base_url.clone(),
            timeout: config.fetch_timeout,
            rate_limit_per_minute: config.rate_limit_per_minute,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

impl From<Article> for Headline {
    fn from(article: Article) -> Self {
        let published_at = article
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Headline::new(article.title.unwrap_or_default(), published_at)
    }
}

/// NewsAPI `/v2/everything` client
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
    rate_limiter: ApiRateLimiter,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }
        let client = builder.build()?;
        let rate_limiter = ApiRateLimiter::new(config.rate_limit_per_minute);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    fn everything_url(&self, query: &str, page_size: usize, language: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .with_context(|| format!("invalid news API base URL: {}", self.config.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("news API base URL cannot have a path: {}", self.config.base_url))?
            .pop_if_empty()
            .extend(&["v2", "everything"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("apiKey", &self.config.api_key)
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("language", language)
            .append_pair("sortBy", "publishedAt");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    async fn throttle(&self) {
        self.rate_limiter.wait().await;
    }

    async fn get_headlines(&self, query: &str, page_size: usize, language: &str) -> Result<HeadlineBatch> {
        if page_size == 0 {
            return Ok(Vec::new());
        }
        let url = self.everything_url(query, page_size, language)?;
        debug!("Requesting {} headlines for {}", page_size, query);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body: EverythingResponse = response
            .json()
            .await
            .with_context(|| format!("malformed news payload for {} (status {})", query, status))?;

        if !status.is_success() || body.status != "ok" {
            return Err(anyhow!(
                "news request for {} failed with status {}: {}",
                query,
                status,
                body.message.unwrap_or_else(|| body.status.clone())
            ));
        }

        let headlines: HeadlineBatch = body
            .articles
            .into_iter()
            .take(page_size)
            .map(Headline::from)
            .collect();

        debug!("Retrieved {} headlines for {}", headlines.len(), query);
        Ok(headlines)
    }
}
