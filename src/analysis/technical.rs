//! Price derived technical score: return volatility times short momentum.

use crate::error::ScoringError;
use crate::models::{PriceSeries, MIN_PRICE_POINTS};

/// Momentum compares the last close with the close this many entries from the end
pub const MOMENTUM_LOOKBACK: usize = 5;

/// Period over period percentage changes, `p[i] / p[i-1] - 1`
pub fn pct_changes(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Sample standard deviation (n - 1 denominator), NaN for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Ratio of the last close to the close `MOMENTUM_LOOKBACK` entries from the end
pub fn momentum(closes: &[f64]) -> Result<f64, ScoringError> {
    if closes.len() < MOMENTUM_LOOKBACK {
        return Err(ScoringError::InsufficientData {
            points: closes.len(),
            required: MOMENTUM_LOOKBACK,
        });
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - MOMENTUM_LOOKBACK];
    if base == 0.0 {
        return Err(ScoringError::DivisionByZero {
            positions_back: MOMENTUM_LOOKBACK - 1,
        });
    }
    Ok(last / base)
}

/// Volatility of percentage changes multiplied by momentum.
///
/// Callers are expected to check `PriceSeries::is_usable` first; a short
/// series is reported as `InsufficientData` rather than scored.
pub fn technical_score(series: &PriceSeries) -> Result<f64, ScoringError> {
    if series.len() < MIN_PRICE_POINTS {
        return Err(ScoringError::InsufficientData {
            points: series.len(),
            required: MIN_PRICE_POINTS,
        });
    }

    let closes = series.closes();
    let volatility = sample_std_dev(&pct_changes(&closes));
    let momentum = momentum(&closes)?;
    let score = volatility * momentum;

    if !score.is_finite() {
        return Err(ScoringError::DegenerateSeries(format!(
            "{}: volatility {} x momentum {} is not finite",
            series.symbol(),
            volatility,
            momentum
        )));
    }
    Ok(score)
}
