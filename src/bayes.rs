//! Bayesian updating of belief that a behavioral tactic is present.
//!
//! The engine compares per-observation evidence scores against a
//! population baseline (the background distribution of the same score
//! when the tactic is absent) and reports a posterior probability, a
//! Beta-conjugate credible interval and a Bayes factor.
//!
//! # Model
//!
//! - `P(evidence | tactic)`: normal density of the evidence mean under
//!   `N(baseline mean, baseline variance)`. A constant baseline is a point
//!   mass: the likelihood is `+∞` when the evidence mean sits on it and 0
//!   otherwise, so the Bayes factor saturates at `+∞` or `0`.
//! - `P(evidence | no tactic)`: the constant `null_likelihood` (0.5 by
//!   default), standing for indifference rather than a marginal computed
//!   from the baseline.
//! - Credible interval: quantiles of
//!   `Beta(s + prior·k, n − s + (1 − prior)·k)` where `s` is the sum of
//!   evidence scores clipped to `[0, 1]` and `k` is the prior strength.
//!
//! # Examples
//!
//! ```
//! use u_evidence::bayes::analyze_tactic;
//!
//! let evidence = [1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0];
//! let baseline = [0.6, 0.8, 0.7, 0.9, 0.75, 0.85, 0.65, 0.8];
//! let analysis = analyze_tactic(&evidence, 0.5, &baseline).unwrap();
//! assert!(analysis.posterior > 0.0 && analysis.posterior < 1.0);
//! let (lo, hi) = analysis.credible_interval;
//! assert!(0.0 <= lo && lo <= hi && hi <= 1.0);
//! ```

use crate::config::InferenceConfig;
use crate::error::{check_finite, InferenceError, Result};
use crate::special::{beta_quantile_with, normal_pdf};
use crate::stats;

/// Posterior probabilities are kept this far from 0 and 1.
const PROBABILITY_EPSILON: f64 = 1e-10;

/// Relative tolerance for "evidence mean equals a constant baseline".
const POINT_MASS_TOLERANCE: f64 = 1e-12;

/// Beta shapes are floored here so a zero prior never yields Beta(0, ·).
const MIN_BETA_SHAPE: f64 = 1e-6;

/// Lower and upper tail of the 95% credible interval.
const CREDIBLE_TAILS: (f64, f64) = (0.025, 0.975);

/// Result of a Bayesian update for one tactic.
///
/// Invariants: `0 < posterior < 1`, `0 ≤ credible_interval.0 ≤
/// credible_interval.1 ≤ 1`, `bayes_factor ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BayesianTacticAnalysis {
    pub posterior: f64,
    pub prior: f64,
    /// `P(evidence | tactic)`; a density, so it may exceed 1.
    pub likelihood: f64,
    /// 95% Beta-conjugate credible interval for the tactic rate.
    pub credible_interval: (f64, f64),
    /// `likelihood / null_likelihood`.
    pub bayes_factor: f64,
}

impl BayesianTacticAnalysis {
    /// True if the evidence favours the tactic over the null.
    pub fn supports_tactic(&self) -> bool {
        self.bayes_factor > 1.0
    }
}

/// Bayesian update with default configuration.
///
/// See [`analyze_tactic_with_config`].
pub fn analyze_tactic(
    evidence: &[f64],
    prior_probability: f64,
    population_baseline: &[f64],
) -> Result<BayesianTacticAnalysis> {
    analyze_tactic_with_config(
        evidence,
        prior_probability,
        population_baseline,
        &InferenceConfig::default(),
    )
}

/// Posterior probability, credible interval and Bayes factor for a tactic.
///
/// # Errors
/// - [`InferenceError::Domain`] if the prior lies outside `[0, 1]` or any
///   input is non-finite.
/// - [`InferenceError::InsufficientSampleSize`] for empty evidence or a
///   baseline with fewer than 2 values.
pub fn analyze_tactic_with_config(
    evidence: &[f64],
    prior_probability: f64,
    population_baseline: &[f64],
    config: &InferenceConfig,
) -> Result<BayesianTacticAnalysis> {
    config.validate()?;
    if !(0.0..=1.0).contains(&prior_probability) {
        return Err(InferenceError::domain(format!(
            "prior probability must be in [0, 1], got {prior_probability}"
        )));
    }
    if evidence.is_empty() {
        return Err(InferenceError::InsufficientSampleSize {
            required: 1,
            actual: 0,
        });
    }
    if population_baseline.len() < 2 {
        return Err(InferenceError::InsufficientSampleSize {
            required: 2,
            actual: population_baseline.len(),
        });
    }
    check_finite("evidence", evidence)?;
    check_finite("population baseline", population_baseline)?;

    let likelihood = baseline_likelihood(evidence, population_baseline)?;
    let prior = prior_probability;
    let null = config.null_likelihood;

    let posterior = if likelihood.is_infinite() {
        if prior > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        let marginal = likelihood * prior + null * (1.0 - prior);
        tracing::trace!(marginal, "marginal probability");
        if marginal > 0.0 {
            likelihood * prior / marginal
        } else {
            prior
        }
    }
    .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);

    let credible_interval = credible_interval(evidence, prior, config)?;
    let bayes_factor = likelihood / null;

    tracing::trace!(likelihood, posterior, bayes_factor, "bayesian update");

    Ok(BayesianTacticAnalysis {
        posterior,
        prior,
        likelihood,
        credible_interval,
        bayes_factor,
    })
}

/// Normal density of the evidence mean under the baseline distribution,
/// or the point-mass limit for a constant baseline.
fn baseline_likelihood(evidence: &[f64], baseline: &[f64]) -> Result<f64> {
    let evidence_mean =
        stats::mean(evidence).ok_or_else(|| InferenceError::domain("empty evidence"))?;
    let baseline_mean =
        stats::mean(baseline).ok_or_else(|| InferenceError::domain("empty baseline"))?;
    let baseline_sd = stats::std_dev(baseline)
        .ok_or_else(|| InferenceError::domain("baseline variance undefined"))?;
    if baseline_sd <= 0.0 {
        let on_baseline = (evidence_mean - baseline_mean).abs()
            <= POINT_MASS_TOLERANCE * baseline_mean.abs().max(1.0);
        tracing::debug!(evidence_mean, baseline_mean, on_baseline, "constant population baseline");
        return Ok(if on_baseline { f64::INFINITY } else { 0.0 });
    }
    let z = (evidence_mean - baseline_mean) / baseline_sd;
    Ok(normal_pdf(z) / baseline_sd)
}

fn credible_interval(evidence: &[f64], prior: f64, config: &InferenceConfig) -> Result<(f64, f64)> {
    let trials = evidence.len() as f64;
    let successes: f64 = evidence.iter().map(|x| x.clamp(0.0, 1.0)).sum();
    let strength = config.prior_strength;

    let alpha = (successes + prior * strength).max(MIN_BETA_SHAPE);
    let beta = (trials - successes + (1.0 - prior) * strength).max(MIN_BETA_SHAPE);

    let lower = beta_quantile_with(CREDIBLE_TAILS.0, alpha, beta, config.beta_quantile)?;
    let upper = beta_quantile_with(CREDIBLE_TAILS.1, alpha, beta, config.beta_quantile)?;
    let (lower, upper) = (lower.clamp(0.0, 1.0), upper.clamp(0.0, 1.0));
    Ok((lower.min(upper), lower.max(upper)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BetaQuantileMethod;

    const EVIDENCE: [f64; 10] = [1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0];
    const BASELINE: [f64; 8] = [0.2, 0.4, 0.3, 0.5, 0.25, 0.35, 0.45, 0.3];

    #[test]
    fn test_posterior_follows_bayes_rule() {
        let a = analyze_tactic(&EVIDENCE, 0.3, &BASELINE).unwrap();
        let expected = a.likelihood * 0.3 / (a.likelihood * 0.3 + 0.5 * 0.7);
        assert!((a.posterior - expected).abs() < 1e-12);
        assert!((a.bayes_factor - a.likelihood / 0.5).abs() < 1e-12);
        assert_eq!(a.prior, 0.3);
    }

    #[test]
    fn test_likelihood_is_baseline_density() {
        let a = analyze_tactic(&EVIDENCE, 0.5, &BASELINE).unwrap();
        let mu = stats::mean(&BASELINE).unwrap();
        let sd = stats::std_dev(&BASELINE).unwrap();
        let x = 0.8;
        let expected = (-(x - mu) * (x - mu) / (2.0 * sd * sd)).exp()
            / (sd * (2.0 * std::f64::consts::PI).sqrt());
        assert!((a.likelihood - expected).abs() < 1e-9);
    }

    #[test]
    fn test_evidence_matching_baseline_is_most_likely() {
        let mu = stats::mean(&BASELINE).unwrap();
        let near = analyze_tactic(&[mu; 5], 0.5, &BASELINE).unwrap();
        let far = analyze_tactic(&[mu + 0.5; 5], 0.5, &BASELINE).unwrap();
        assert!(near.bayes_factor > far.bayes_factor);
        assert!(near.posterior > far.posterior);
        assert!(near.supports_tactic());
    }

    #[test]
    fn test_posterior_strictly_inside_unit_interval() {
        // Evidence absurdly far from the baseline underflows the density.
        let a = analyze_tactic(&[1e6; 10], 0.5, &BASELINE).unwrap();
        assert!(a.posterior > 0.0 && a.posterior < 1.0);
        assert!(a.bayes_factor >= 0.0);

        let certain = analyze_tactic(&EVIDENCE, 1.0, &BASELINE).unwrap();
        assert!(certain.posterior < 1.0);
        let impossible = analyze_tactic(&EVIDENCE, 0.0, &BASELINE).unwrap();
        assert!(impossible.posterior > 0.0);
    }

    #[test]
    fn test_credible_interval_normal_branch() {
        // Beta(8 + 5, 2 + 5): both shapes above 5.
        let a = analyze_tactic(&EVIDENCE, 0.5, &BASELINE).unwrap();
        let mean = 13.0 / 20.0;
        let sd = (13.0 * 7.0 / (400.0 * 21.0_f64)).sqrt();
        let (lo, hi) = a.credible_interval;
        assert!((lo - (mean - 1.959964 * sd)).abs() < 1e-5);
        assert!((hi - (mean + 1.959964 * sd)).abs() < 1e-5);
    }

    #[test]
    fn test_credible_interval_mean_fallback_is_degenerate() {
        // Beta(2 + 1, 1 + 9) with prior 0.1: beta > 5 but alpha < 5.
        let a = analyze_tactic(&[1.0, 1.0, 0.0], 0.1, &BASELINE).unwrap();
        let (lo, hi) = a.credible_interval;
        assert!((lo - 3.0 / 13.0).abs() < 1e-12);
        assert_eq!(lo, hi);
    }

    #[test]
    fn test_exact_credible_interval_has_width() {
        let config = InferenceConfig::new().with_beta_quantile(BetaQuantileMethod::Exact);
        let a = analyze_tactic_with_config(&[1.0, 1.0, 0.0], 0.1, &BASELINE, &config).unwrap();
        let (lo, hi) = a.credible_interval;
        assert!(0.0 <= lo && lo < 3.0 / 13.0 && 3.0 / 13.0 < hi && hi <= 1.0);
    }

    #[test]
    fn test_zero_prior_keeps_shapes_positive() {
        let a = analyze_tactic(&[0.0; 4], 0.0, &BASELINE).unwrap();
        let (lo, hi) = a.credible_interval;
        assert!(lo >= 0.0 && hi <= 1.0 && lo <= hi);
    }

    #[test]
    fn test_constant_baseline_away_from_evidence() {
        let a = analyze_tactic(&[1.0, 0.0, 1.0, 1.0], 0.3, &[0.0; 20]).unwrap();
        assert_eq!(a.likelihood, 0.0);
        assert_eq!(a.bayes_factor, 0.0);
        assert_eq!(a.posterior, PROBABILITY_EPSILON);
        assert!(!a.supports_tactic());
        let (lo, hi) = a.credible_interval;
        assert!(0.0 <= lo && lo <= hi && hi <= 1.0);
    }

    #[test]
    fn test_constant_baseline_matching_evidence_saturates() {
        let a = analyze_tactic(&[1.0; 8], 0.3, &[1.0; 12]).unwrap();
        assert_eq!(a.bayes_factor, f64::INFINITY);
        assert_eq!(a.posterior, 1.0 - PROBABILITY_EPSILON);
        assert!(a.supports_tactic());

        let ruled_out = analyze_tactic(&[1.0; 8], 0.0, &[1.0; 12]).unwrap();
        assert_eq!(ruled_out.posterior, PROBABILITY_EPSILON);
    }

    #[test]
    fn test_custom_null_likelihood() {
        let config = InferenceConfig::new().with_null_likelihood(2.0);
        let a = analyze_tactic_with_config(&EVIDENCE, 0.5, &BASELINE, &config).unwrap();
        assert!((a.bayes_factor - a.likelihood / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_input_errors() {
        assert!(matches!(
            analyze_tactic(&EVIDENCE, 1.5, &BASELINE),
            Err(InferenceError::Domain(_))
        ));
        assert!(matches!(
            analyze_tactic(&[], 0.5, &BASELINE),
            Err(InferenceError::InsufficientSampleSize { .. })
        ));
        assert!(matches!(
            analyze_tactic(&EVIDENCE, 0.5, &[0.3]),
            Err(InferenceError::InsufficientSampleSize { .. })
        ));
        assert!(matches!(
            analyze_tactic(&[f64::NAN], 0.5, &BASELINE),
            Err(InferenceError::Domain(_))
        ));
    }
}
