//! Tunable thresholds for the inference primitives.
//!
//! Every operation has a plain entry point that uses
//! [`InferenceConfig::default`] and a `*_with_config` variant for callers
//! that need to lower the sample-size threshold, change the prior strength,
//! or switch the Beta quantile method.

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE, DEFAULT_POWER,
    MAX_SEARCH_SAMPLE_SIZE, MIN_SEARCH_SAMPLE_SIZE, MIN_SAMPLE_SIZE, NULL_LIKELIHOOD,
    PRIOR_STRENGTH, P_VALUE_FLOOR,
};
use crate::error::{check_open_unit, InferenceError, Result};

/// How [`crate::special::beta_quantile_with`] inverts the Beta CDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BetaQuantileMethod {
    /// Closed form for unit shapes, normal approximation when both shapes
    /// exceed 5, distribution mean otherwise.
    #[default]
    Approximate,
    /// Bisection on the regularized incomplete beta function.
    Exact,
}

/// Configuration shared by all components.
///
/// The `*_with_config` entry points read their optional arguments
/// (confidence level, replicate count, target power, alpha) from here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InferenceConfig {
    /// Minimum observations for [`crate::interval::confidence_interval`].
    /// Default: 10.
    pub min_sample_size: usize,

    /// Floor applied to reported p-values. Default: 1e-10.
    pub p_value_floor: f64,

    /// Pseudo-observations the prior contributes to the Beta credible
    /// interval. Default: 10.
    pub prior_strength: f64,

    /// Likelihood of the evidence when no tactic is present. Default: 0.5.
    pub null_likelihood: f64,

    /// Beta quantile inversion used for credible intervals.
    pub beta_quantile: BetaQuantileMethod,

    /// Upper bound of the required-sample-size search. Default: 10,000.
    pub max_search_sample_size: usize,

    /// Two-sided confidence level for intervals. Default: 0.95.
    pub confidence: f64,

    /// Bootstrap replicates. Default: 1000.
    pub bootstrap_iterations: usize,

    /// Target power for sample-size planning. Default: 0.8.
    pub desired_power: f64,

    /// Significance level for power analysis. Default: 0.05.
    pub alpha: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_sample_size: MIN_SAMPLE_SIZE,
            p_value_floor: P_VALUE_FLOOR,
            prior_strength: PRIOR_STRENGTH,
            null_likelihood: NULL_LIKELIHOOD,
            beta_quantile: BetaQuantileMethod::Approximate,
            max_search_sample_size: MAX_SEARCH_SAMPLE_SIZE,
            confidence: DEFAULT_CONFIDENCE,
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            desired_power: DEFAULT_POWER,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowers (or raises) the interval-estimation sample threshold.
    pub fn with_min_sample_size(mut self, n: usize) -> Self {
        self.min_sample_size = n;
        self
    }

    pub fn with_p_value_floor(mut self, floor: f64) -> Self {
        self.p_value_floor = floor;
        self
    }

    pub fn with_prior_strength(mut self, strength: f64) -> Self {
        self.prior_strength = strength;
        self
    }

    pub fn with_null_likelihood(mut self, likelihood: f64) -> Self {
        self.null_likelihood = likelihood;
        self
    }

    pub fn with_beta_quantile(mut self, method: BetaQuantileMethod) -> Self {
        self.beta_quantile = method;
        self
    }

    pub fn with_max_search_sample_size(mut self, n: usize) -> Self {
        self.max_search_sample_size = n;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_bootstrap_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap_iterations = iterations;
        self
    }

    pub fn with_desired_power(mut self, power: f64) -> Self {
        self.desired_power = power;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    /// [`InferenceError::Domain`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.min_sample_size < 2 {
            return Err(InferenceError::domain(
                "min_sample_size must be at least 2",
            ));
        }
        if !(self.p_value_floor > 0.0 && self.p_value_floor < 1.0) {
            return Err(InferenceError::domain("p_value_floor must be in (0, 1)"));
        }
        if !(self.prior_strength.is_finite() && self.prior_strength > 0.0) {
            return Err(InferenceError::domain(
                "prior_strength must be positive and finite",
            ));
        }
        if !(self.null_likelihood.is_finite() && self.null_likelihood > 0.0) {
            return Err(InferenceError::domain(
                "null_likelihood must be positive and finite",
            ));
        }
        if self.max_search_sample_size < MIN_SEARCH_SAMPLE_SIZE {
            return Err(InferenceError::domain(format!(
                "max_search_sample_size must be at least {MIN_SEARCH_SAMPLE_SIZE}"
            )));
        }
        if self.bootstrap_iterations == 0 {
            return Err(InferenceError::domain(
                "bootstrap_iterations must be at least 1",
            ));
        }
        check_open_unit("confidence", self.confidence)?;
        check_open_unit("desired_power", self.desired_power)?;
        check_open_unit("alpha", self.alpha)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = InferenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_sample_size, 10);
        assert_eq!(config.max_search_sample_size, 10_000);
        assert_eq!(config.beta_quantile, BetaQuantileMethod::Approximate);
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.bootstrap_iterations, 1000);
        assert_eq!(config.desired_power, 0.8);
        assert_eq!(config.alpha, 0.05);
    }

    #[test]
    fn test_builder_methods() {
        let config = InferenceConfig::new()
            .with_min_sample_size(5)
            .with_prior_strength(2.0)
            .with_beta_quantile(BetaQuantileMethod::Exact);
        assert_eq!(config.min_sample_size, 5);
        assert_eq!(config.prior_strength, 2.0);
        assert_eq!(config.beta_quantile, BetaQuantileMethod::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(InferenceConfig::new().with_min_sample_size(1).validate().is_err());
        assert!(InferenceConfig::new().with_p_value_floor(0.0).validate().is_err());
        assert!(InferenceConfig::new().with_prior_strength(-1.0).validate().is_err());
        assert!(InferenceConfig::new()
            .with_null_likelihood(f64::NAN)
            .validate()
            .is_err());
        assert!(InferenceConfig::new()
            .with_max_search_sample_size(2)
            .validate()
            .is_err());
        assert!(InferenceConfig::new().with_confidence(1.0).validate().is_err());
        assert!(InferenceConfig::new()
            .with_bootstrap_iterations(0)
            .validate()
            .is_err());
        assert!(InferenceConfig::new().with_desired_power(0.0).validate().is_err());
        assert!(InferenceConfig::new().with_alpha(f64::NAN).validate().is_err());
    }
}
