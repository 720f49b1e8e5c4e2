//! Effect size, statistical power and sample-size planning.
//!
//! # Examples
//!
//! ```
//! use u_evidence::power::{cohens_d, required_sample_size, EffectSize};
//!
//! let treated = [5.1, 5.8, 6.2, 5.5, 6.0];
//! let control = [4.2, 4.9, 4.4, 5.0, 4.6];
//! let d = cohens_d(&treated, &control).unwrap();
//! assert!(d.value().unwrap() > 0.8);
//!
//! let n = required_sample_size(0.5, 0.8, 0.05).unwrap();
//! assert!(n > 10 && n < 100);
//! ```

use crate::config::InferenceConfig;
use crate::constants::MIN_SEARCH_SAMPLE_SIZE;
use crate::error::{check_finite, check_open_unit, InferenceError, Result};
use crate::special::{normal_cdf, t_critical};
use crate::stats;

/// Standardised mean difference between two groups.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSize {
    Defined(f64),
    /// Both groups are internally constant but their means differ, so the
    /// pooled standard deviation is zero and d would be infinite.
    Undefined { mean_difference: f64 },
}

impl EffectSize {
    /// The effect size, or `None` when undefined.
    pub fn value(&self) -> Option<f64> {
        match *self {
            EffectSize::Defined(d) => Some(d),
            EffectSize::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, EffectSize::Defined(_))
    }
}

fn check_group(name: &str, group: &[f64]) -> Result<()> {
    if group.len() < 2 {
        return Err(InferenceError::InsufficientSampleSize {
            required: 2,
            actual: group.len(),
        });
    }
    check_finite(name, group)
}

/// Pooled standard deviation, weighting each group's unbiased variance by
/// its degrees of freedom.
///
/// # Errors
/// [`InferenceError::InsufficientSampleSize`] if either group has fewer
/// than 2 values; [`InferenceError::Domain`] for non-finite values.
pub fn pooled_std_dev(group_a: &[f64], group_b: &[f64]) -> Result<f64> {
    check_group("first group", group_a)?;
    check_group("second group", group_b)?;
    let undefined = || InferenceError::domain("group variance undefined");
    let var_a = stats::variance(group_a).ok_or_else(undefined)?;
    let var_b = stats::variance(group_b).ok_or_else(undefined)?;
    let df_a = (group_a.len() - 1) as f64;
    let df_b = (group_b.len() - 1) as f64;
    Ok(((df_a * var_a + df_b * var_b) / (df_a + df_b)).sqrt())
}

/// Cohen's d for two independent groups, `(mean_a − mean_b) / s_pooled`.
///
/// With zero pooled variance the result is `Defined(0.0)` if the means are
/// equal and [`EffectSize::Undefined`] otherwise.
///
/// # Errors
/// See [`pooled_std_dev`].
pub fn cohens_d(group_a: &[f64], group_b: &[f64]) -> Result<EffectSize> {
    let pooled = pooled_std_dev(group_a, group_b)?;
    let undefined = || InferenceError::domain("empty group");
    let mean_difference =
        stats::mean(group_a).ok_or_else(undefined)? - stats::mean(group_b).ok_or_else(undefined)?;

    if pooled > 0.0 {
        return Ok(EffectSize::Defined(mean_difference / pooled));
    }
    if mean_difference == 0.0 {
        return Ok(EffectSize::Defined(0.0));
    }
    tracing::warn!(mean_difference, "effect size undefined: zero pooled variance");
    Ok(EffectSize::Undefined { mean_difference })
}

/// Approximate power of a two-sided one-sample t-test.
///
/// `ncp = |d|·√n`, `t_crit` from [`t_critical`] at `n − 1` degrees of
/// freedom, power `= 1 − Φ(t_crit − ncp)` clamped to `[0, 1]`.
///
/// # Errors
/// [`InferenceError::Domain`] for `n < 2`, `alpha` outside `(0, 1)` or a
/// non-finite effect size.
pub fn statistical_power(effect_size: f64, sample_size: usize, alpha: f64) -> Result<f64> {
    if !effect_size.is_finite() {
        return Err(InferenceError::domain(format!(
            "effect size must be finite, got {effect_size}"
        )));
    }
    if sample_size < 2 {
        return Err(InferenceError::domain(format!(
            "power needs at least 2 observations, got {sample_size}"
        )));
    }
    check_open_unit("alpha", alpha)?;

    let n = sample_size as f64;
    let ncp = effect_size.abs() * n.sqrt();
    let critical = t_critical(1.0 - alpha, n - 1.0)?;
    Ok((1.0 - normal_cdf(critical - ncp)).clamp(0.0, 1.0))
}

/// Smallest sample size reaching `desired_power` at `alpha`, other settings
/// at their defaults.
///
/// See [`required_sample_size_with_config`].
pub fn required_sample_size(effect_size: f64, desired_power: f64, alpha: f64) -> Result<usize> {
    let config = InferenceConfig::default()
        .with_desired_power(desired_power)
        .with_alpha(alpha);
    required_sample_size_with_config(effect_size, &config)
}

/// Smallest sample size whose [`statistical_power`] at `config.alpha`
/// reaches `config.desired_power` (0.05 and 0.8 by default).
///
/// Searches `n = 3, 4, …` up to `config.max_search_sample_size`. If the
/// target is never reached the cap itself is returned: callers must compare
/// against the cap to tell an unreachable target from success.
///
/// # Errors
/// [`InferenceError::Domain`] for a desired power or alpha outside
/// `(0, 1)`, or a non-finite effect size.
pub fn required_sample_size_with_config(effect_size: f64, config: &InferenceConfig) -> Result<usize> {
    config.validate()?;
    let desired_power = config.desired_power;
    let alpha = config.alpha;
    let cap = config.max_search_sample_size;

    for n in MIN_SEARCH_SAMPLE_SIZE..=cap {
        if statistical_power(effect_size, n, alpha)? >= desired_power {
            return Ok(n);
        }
    }
    tracing::warn!(
        effect_size,
        desired_power,
        cap,
        "target power unreachable within search bound"
    );
    Ok(cap)
}

// ============================================================================
// Tests
// ============================================================================
