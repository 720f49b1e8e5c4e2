//! Confidence interval estimation and one-sample significance testing.
//!
//! # Examples
//!
//! ```
//! use u_evidence::interval::confidence_interval;
//!
//! let data: Vec<f64> = (1..=10).map(f64::from).collect();
//! let evidence = confidence_interval(&data, 0.95).unwrap();
//! assert_eq!(evidence.observations, 10);
//! assert!((evidence.mean - 5.5).abs() < 1e-12);
//! assert!(evidence.confidence_interval.0 < 5.5 && 5.5 < evidence.confidence_interval.1);
//! ```

use crate::config::InferenceConfig;
use crate::constants::LARGE_DF;
use crate::error::{check_finite, InferenceError, Result};
use crate::power::EffectSize;
use crate::special::{normal_cdf, t_critical};
use crate::stats;

/// Summary of a sample with its interval estimate and significance test.
///
/// Invariants: `confidence_interval.0 ≤ mean ≤ confidence_interval.1`,
/// `0 < p_value ≤ 1`, `observations ≥ min_sample_size`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticalEvidence {
    pub observations: usize,
    pub mean: f64,
    /// Unbiased sample variance.
    pub variance: f64,
    pub standard_error: f64,
    /// Two-sided interval `mean ± t_crit · standard_error`.
    pub confidence_interval: (f64, f64),
    /// Two-tailed p-value of H₀: μ = 0.
    pub p_value: f64,
    /// Standardised mean, `mean / √variance`. Undefined for a constant
    /// non-zero sample, where `mean_difference` carries the mean.
    pub effect_size: EffectSize,
    /// `1 − confidence`.
    pub significance_level: f64,
}

impl StatisticalEvidence {
    /// Half-width of the interval.
    pub fn margin_of_error(&self) -> f64 {
        (self.confidence_interval.1 - self.confidence_interval.0) / 2.0
    }

    /// True if the p-value is below the significance level.
    pub fn is_significant(&self) -> bool {
        self.p_value < self.significance_level
    }
}

/// Interval estimate and one-sample t-test at the given confidence level,
/// all other settings at their defaults.
///
/// See [`confidence_interval_with_config`].
pub fn confidence_interval(data: &[f64], confidence: f64) -> Result<StatisticalEvidence> {
    let config = InferenceConfig::default().with_confidence(confidence);
    confidence_interval_with_config(data, &config)
}

/// Interval estimate and one-sample t-test at `config.confidence`.
///
/// # Algorithm
/// 1. Mean, unbiased variance and standard error `√(variance/n)`.
/// 2. Interval `mean ± t_crit · SE` with `t_crit` from
///    [`t_critical`](crate::special::t_critical) at `df = n − 1`.
/// 3. `t = mean / SE`; two-tailed `p = 2·(1 − Φ(|t|))`, inflated by
///    `1 + t²/(4·df)` below 30 degrees of freedom, clamped to
///    `[p_value_floor, 1]`.
///
/// A constant sample has a zero standard error: the interval collapses to
/// `(mean, mean)`, the p-value is 1 for a zero mean and the floor
/// otherwise, and the effect size is [`EffectSize::Undefined`] unless the
/// mean is zero.
///
/// # Errors
/// - [`InferenceError::InsufficientSampleSize`] if `data.len()` is below
///   `config.min_sample_size`.
/// - [`InferenceError::Domain`] for an invalid config (including a
///   confidence outside `(0, 1)`) or non-finite data.
pub fn confidence_interval_with_config(
    data: &[f64],
    config: &InferenceConfig,
) -> Result<StatisticalEvidence> {
    config.validate()?;
    let confidence = config.confidence;
    if data.len() < config.min_sample_size {
        return Err(InferenceError::InsufficientSampleSize {
            required: config.min_sample_size,
            actual: data.len(),
        });
    }
    check_finite("sample", data)?;

    let n = data.len();
    let mean = stats::mean(data).ok_or_else(|| InferenceError::domain("empty sample"))?;
    let variance = stats::variance(data).ok_or_else(|| InferenceError::domain("empty sample"))?;
    if variance <= 0.0 {
        return Ok(constant_sample(n, mean, confidence, config.p_value_floor));
    }
    let standard_error = (variance / n as f64).sqrt();

    let df = (n - 1) as f64;
    let margin = t_critical(confidence, df)? * standard_error;

    let t = mean / standard_error;
    let p_value = two_tailed_p_value(t, df, config.p_value_floor);

    Ok(StatisticalEvidence {
        observations: n,
        mean,
        variance,
        standard_error,
        confidence_interval: (mean - margin, mean + margin),
        p_value,
        effect_size: EffectSize::Defined(mean / variance.sqrt()),
        significance_level: 1.0 - confidence,
    })
}

/// Degenerate evidence for a sample with zero variance.
fn constant_sample(n: usize, mean: f64, confidence: f64, floor: f64) -> StatisticalEvidence {
    let (p_value, effect_size) = if mean == 0.0 {
        (1.0, EffectSize::Defined(0.0))
    } else {
        (floor, EffectSize::Undefined { mean_difference: mean })
    };
    tracing::debug!(observations = n, mean, "constant sample: zero-width interval");
    StatisticalEvidence {
        observations: n,
        mean,
        variance: 0.0,
        standard_error: 0.0,
        confidence_interval: (mean, mean),
        p_value,
        effect_size,
        significance_level: 1.0 - confidence,
    }
}

/// Normal-approximation two-tailed p-value with a small-df correction.
fn two_tailed_p_value(t: f64, df: f64, floor: f64) -> f64 {
    let mut p = 2.0 * (1.0 - normal_cdf(t.abs()));
    if df < LARGE_DF {
        p *= 1.0 + t * t / (4.0 * df);
    }
    p.clamp(floor, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
