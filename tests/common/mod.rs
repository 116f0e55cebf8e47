//! Common test utilities and helpers


use chrono::{Duration, TimeZone, Utc};
use stock_ranker::models::{PricePoint, PriceSeries};

/// Test data utilities
pub mod test_data {
    use super::*;

    /// Closes used by the reference scenario
    pub const REFERENCE_CLOSES: [f64; 6] = [10.0, 11.0, 10.0, 12.0, 11.0, 13.0];

    /// Hourly series starting at a fixed market open
    pub fn create_test_series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 13, 30, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint::new(start + Duration::hours(i as i64), *close))
            .collect();
        PriceSeries::new(symbol, points).expect("test series must be ordered")
    }

    pub fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }
}

/// Logging utilities for tests
pub mod logging {
    use tracing::{debug, info};

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
