use thiserror::Error;

/// Errors raised before any candidate is scored.
///
/// Individual records never fail; missing or malformed fields fall back
/// to neutral similarity values instead.
#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid threshold: {0} (must be a finite number)")]
    InvalidThreshold(f64),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}
