use thiserror::Error;

/// Failures raised by the pure scoring functions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("series for {symbol} is not strictly increasing at index {index}")]
    UnorderedSeries { symbol: String, index: usize },

    #[error("insufficient data: {points} points, need at least {required}")]
    InsufficientData { points: usize, required: usize },

    #[error("division by zero: close {positions_back} positions back is 0")]
    DivisionByZero { positions_back: usize },

    #[error("degenerate series: {0}")]
    DegenerateSeries(String),
}

impl ScoringError {
    /// Errors that mean the series itself cannot be scored
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            ScoringError::DivisionByZero { .. } | ScoringError::DegenerateSeries(_)
        )
    }
}
