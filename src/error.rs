//! Error taxonomy for inference operations.
//!
//! Every error is a local computation error: nothing here is transient, so
//! callers should never retry. Operations fail as a whole and return no
//! partial results.

use thiserror::Error;

/// Errors raised by the inference primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// The sample is smaller than the minimum required for the estimate.
    #[error("insufficient sample size: need at least {required} observations, got {actual}")]
    InsufficientSampleSize { required: usize, actual: usize },

    /// An argument lies outside its valid range (probabilities, confidence
    /// levels, shape parameters, non-finite values).
    #[error("domain error: {0}")]
    Domain(String),

    /// Cross-validation fold count is not in `2..=observations`.
    #[error("invalid fold count: {folds} folds requested for {observations} observations")]
    InvalidFoldCount { folds: usize, observations: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InferenceError>;

impl InferenceError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        InferenceError::Domain(msg.into())
    }
}

/// Fails with [`InferenceError::Domain`] unless `p` lies strictly inside `(0, 1)`.
pub(crate) fn check_open_unit(name: &str, p: f64) -> Result<()> {
    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return Err(InferenceError::domain(format!(
            "{name} must be in (0, 1), got {p}"
        )));
    }
    Ok(())
}

/// Fails with [`InferenceError::Domain`] if any value is NaN or infinite.
pub(crate) fn check_finite(name: &str, data: &[f64]) -> Result<()> {
    if let Some(bad) = data.iter().find(|x| !x.is_finite()) {
        return Err(InferenceError::domain(format!(
            "{name} contains non-finite value {bad}"
        )));
    }
    Ok(())
}
