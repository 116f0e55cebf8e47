use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ScoringError;

/// Minimum number of closes a series needs before it can be scored
pub const MIN_PRICE_POINTS: usize = 6;

/// Single close price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Ordered close prices for one symbol (strictly increasing timestamps)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting timestamps that do not strictly increase
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, ScoringError> {
        let symbol = symbol.into();
        if let Some(pos) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(ScoringError::UnorderedSeries {
                symbol,
                index: pos + 1,
            });
        }
        Ok(Self { symbol, points })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the series has enough points for the technical score
    pub fn is_usable(&self) -> bool {
        self.points.len() >= MIN_PRICE_POINTS
    }
}

/// A news headline for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(text: impl Into<String>, published_at: Option<DateTime<Utc>>) -> Self {
        Self {
            text: text.into(),
            published_at,
        }
    }
}

pub type HeadlineBatch = Vec<Headline>;

/// Discrete recommendation derived from the super-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Neutral,
    Avoid,
}

impl Recommendation {
    /// Human readable label used in tables
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy possible",
            Recommendation::Neutral => "Neutral / caution",
            Recommendation::Avoid => "Do not trade",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring result for one successfully processed symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub symbol: String,
    pub super_score: f64,
    pub technical_score: f64,
    pub sentiment: f64,
    pub recommendation: Recommendation,
    pub headline_count: usize,
}

/// Why a symbol dropped out of a run
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InsufficientData { points: usize },
    DegenerateSeries { detail: String },
    ProviderUnavailable { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientData { points } => {
                write!(f, "insufficient data ({} points, need {})", points, MIN_PRICE_POINTS)
            }
            SkipReason::DegenerateSeries { detail } => write!(f, "degenerate series: {}", detail),
            SkipReason::ProviderUnavailable { detail } => {
                write!(f, "price provider unavailable: {}", detail)
            }
        }
    }
}

/// Terminal state of a symbol after the runner is done with it
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Scored(RankedResult),
    Skipped { symbol: String, reason: SkipReason },
}

/// A symbol that was skipped during a run
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Everything a run hands to the presentation layer
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Scored symbols, super-score descending
    pub results: Vec<RankedResult>,
    /// Close series for each scored symbol, in ranking order
    pub series: Vec<PriceSeries>,
    /// Skipped symbols, in universe order
    pub skipped: Vec<SkippedSymbol>,
    pub total_symbols: usize,
}

impl RunReport {
    pub fn scored_count(&self) -> usize {
        self.results.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Close series for a symbol, if it was scored
    pub fn series_for(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.symbol() == symbol)
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub news_api_base_url: String,
    pub price_api_base_url: String,
    pub price_period: String,
    pub price_interval: String,
    pub headline_page_size: usize,
    pub news_language: String,
    pub target_language: String,
    pub rate_limit_per_minute: u32,
    pub num_workers: usize,
    pub fetch_timeout: Duration,
    pub universe_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_base_url: "https://newsapi.org".to_string(),
            price_api_base_url: "https://query1.finance.yahoo.com".to_string(),
            price_period: "5d".to_string(),
            price_interval: "1h".to_string(),
            headline_page_size: 5,
            news_language: "en".to_string(),
            target_language: "eng".to_string(),
            rate_limit_per_minute: 0,
            num_workers: 1,
            fetch_timeout: Duration::from_secs(30),
            universe_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let parse_or = |key: &str, default: u64| -> anyhow::Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", key, raw)),
                None => Ok(default),
            }
        };

        let num_workers = parse_or("NUM_WORKERS", defaults.num_workers as u64)? as usize;
        if num_workers == 0 {
            anyhow::bail!("NUM_WORKERS must be at least 1");
        }

        let target_language = lookup("TARGET_LANGUAGE").unwrap_or(defaults.target_language);
        if whatlang::Lang::from_code(&target_language).is_none() {
            anyhow::bail!("TARGET_LANGUAGE '{}' is not an ISO 639-3 code", target_language);
        }

        Ok(Config {
            news_api_key: lookup("NEWS_API_KEY").filter(|k| !k.trim().is_empty()),
            news_api_base_url: lookup("NEWS_API_BASE_URL").unwrap_or(defaults.news_api_base_url),
            price_api_base_url: lookup("PRICE_API_BASE_URL").unwrap_or(defaults.price_api_base_url),
            price_period: lookup("PRICE_PERIOD").unwrap_or(defaults.price_period),
            price_interval: lookup("PRICE_INTERVAL").unwrap_or(defaults.price_interval),
            headline_page_size: parse_or("HEADLINE_PAGE_SIZE", defaults.headline_page_size as u64)? as usize,
            news_language: lookup("NEWS_LANGUAGE").unwrap_or(defaults.news_language),
            target_language,
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 0)? as u32,
            num_workers,
            fetch_timeout: Duration::from_secs(parse_or("FETCH_TIMEOUT_SECS", 30)?),
            universe_path: lookup("UNIVERSE_PATH").filter(|p| !p.trim().is_empty()),
        })
    }
}
