//! Reliability and validity scores aggregated from the other components.
//!
//! Nothing here is a new estimator: each score is a correlation, an
//! agreement rate or a cross-validation mean over evidence the caller
//! already holds. Every input is optional and the matching score is `None`
//! when its evidence was not supplied, or when a correlation is undefined
//! because one series is constant.

use crate::error::{check_finite, InferenceError, Result};
use crate::resampling::CrossValidationSummary;
use crate::stats;

/// Paired evidence for [`ValidationMetrics::from_inputs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationInputs<'a> {
    /// Two measures of the same construct.
    pub convergent: Option<(&'a [f64], &'a [f64])>,
    /// Measures of two constructs that should be unrelated.
    pub discriminant: Option<(&'a [f64], &'a [f64])>,
    /// The same measure taken at two points in time.
    pub test_retest: Option<(&'a [f64], &'a [f64])>,
    /// Binary judgements by two independent raters.
    pub inter_rater: Option<(&'a [bool], &'a [bool])>,
    /// Predicted probabilities and observed binary outcomes.
    pub predictions: Option<(&'a [f64], &'a [bool])>,
    pub cross_validation: Option<&'a CrossValidationSummary>,
}

/// Aggregate validity and reliability scores.
///
/// All scores except `cross_validation_score` lie in `[0, 1]`; the
/// cross-validation score is whatever the caller's test closure measures.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationMetrics {
    /// `|r|` between two measures of one construct.
    pub convergent_validity: Option<f64>,
    /// `1 − |r|` between measures of distinct constructs.
    pub discriminant_validity: Option<f64>,
    /// `max(0, r)` between two administrations.
    pub test_retest_reliability: Option<f64>,
    /// Cohen's κ, clamped to `[0, 1]`.
    pub inter_rater_reliability: Option<f64>,
    /// Fraction of predictions (thresholded at 0.5) matching outcomes.
    pub predictive_accuracy: Option<f64>,
    /// Mean fold score.
    pub cross_validation_score: Option<f64>,
}

impl ValidationMetrics {
    /// Computes every score whose evidence is present.
    ///
    /// # Errors
    /// - [`InferenceError::Domain`] for mismatched pairs and non-finite
    ///   values.
    /// - [`InferenceError::InsufficientSampleSize`] for pairs shorter than 2.
    ///
    /// # Examples
    /// ```
    /// use u_evidence::validation::{ValidationInputs, ValidationMetrics};
    ///
    /// let first = [1.0, 2.0, 3.0, 4.0, 5.0];
    /// let second = [1.1, 2.1, 2.9, 4.2, 4.8];
    /// let inputs = ValidationInputs {
    ///     test_retest: Some((&first, &second)),
    ///     ..Default::default()
    /// };
    /// let metrics = ValidationMetrics::from_inputs(&inputs).unwrap();
    /// assert!(metrics.test_retest_reliability.unwrap() > 0.95);
    /// assert_eq!(metrics.convergent_validity, None);
    /// ```
    pub fn from_inputs(inputs: &ValidationInputs<'_>) -> Result<Self> {
        let convergent_validity = inputs
            .convergent
            .map(|(a, b)| correlation("convergent measures", a, b))
            .transpose()?
            .flatten()
            .map(f64::abs);
        let discriminant_validity = inputs
            .discriminant
            .map(|(a, b)| correlation("discriminant measures", a, b))
            .transpose()?
            .flatten()
            .map(|r| 1.0 - r.abs());
        let test_retest_reliability = inputs
            .test_retest
            .map(|(a, b)| correlation("test-retest measures", a, b))
            .transpose()?
            .flatten()
            .map(|r| r.max(0.0));
        let inter_rater_reliability = inputs
            .inter_rater
            .map(|(a, b)| cohens_kappa(a, b).map(|k| k.clamp(0.0, 1.0)))
            .transpose()?;
        let predictive_accuracy = inputs
            .predictions
            .map(|(p, o)| predictive_accuracy(p, o))
            .transpose()?;
        let cross_validation_score = inputs.cross_validation.map(|cv| cv.mean);

        Ok(Self {
            convergent_validity,
            discriminant_validity,
            test_retest_reliability,
            inter_rater_reliability,
            predictive_accuracy,
            cross_validation_score,
        })
    }

    /// Mean of the `[0, 1]` scores that are present, `None` if there are
    /// none. The cross-validation score is excluded as it is unbounded.
    pub fn overall_reliability(&self) -> Option<f64> {
        let present: Vec<f64> = [
            self.convergent_validity,
            self.discriminant_validity,
            self.test_retest_reliability,
            self.inter_rater_reliability,
            self.predictive_accuracy,
        ]
        .into_iter()
        .flatten()
        .collect();
        stats::mean(&present)
    }
}

fn check_pair_len(name: &str, a: usize, b: usize) -> Result<()> {
    if a != b {
        return Err(InferenceError::domain(format!(
            "{name} have different lengths ({a} vs {b})"
        )));
    }
    if a < 2 {
        return Err(InferenceError::InsufficientSampleSize {
            required: 2,
            actual: a,
        });
    }
    Ok(())
}

/// Pearson's r, `None` when either series is constant.
fn correlation(name: &str, a: &[f64], b: &[f64]) -> Result<Option<f64>> {
    check_pair_len(name, a.len(), b.len())?;
    check_finite(name, a)?;
    check_finite(name, b)?;
    let r = stats::pearson_correlation(a, b);
    if r.is_none() {
        tracing::debug!(measures = name, "correlation undefined for a constant series");
    }
    Ok(r)
}

/// Cohen's κ for two raters making binary judgements.
///
/// Reference: Cohen (1960), "A Coefficient of Agreement for Nominal
/// Scales", *Educational and Psychological Measurement* 20(1).
fn cohens_kappa(a: &[bool], b: &[bool]) -> Result<f64> {
    check_pair_len("rater judgements", a.len(), b.len())?;
    let n = a.len() as f64;
    let agree = a.iter().zip(b).filter(|(x, y)| x == y).count() as f64;
    let yes_a = a.iter().filter(|&&x| x).count() as f64 / n;
    let yes_b = b.iter().filter(|&&x| x).count() as f64 / n;

    let observed = agree / n;
    let chance = yes_a * yes_b + (1.0 - yes_a) * (1.0 - yes_b);
    if chance >= 1.0 {
        // Both raters gave one constant answer; they agree iff it matches.
        return Ok(if observed >= 1.0 { 1.0 } else { 0.0 });
    }
    Ok((observed - chance) / (1.0 - chance))
}

fn predictive_accuracy(predicted: &[f64], outcomes: &[bool]) -> Result<f64> {
    if predicted.len() != outcomes.len() || predicted.is_empty() {
        return Err(InferenceError::domain(format!(
            "predictions and outcomes must be non-empty and aligned ({} vs {})",
            predicted.len(),
            outcomes.len()
        )));
    }
    check_finite("predictions", predicted)?;
    let hits = predicted
        .iter()
        .zip(outcomes)
        .filter(|&(&p, &o)| (p >= 0.5) == o)
        .count();
    Ok(hits as f64 / predicted.len() as f64)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const B: [f64; 6] = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
    const NOISE: [f64; 6] = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0];

    #[test]
    fn test_empty_inputs_yield_empty_metrics() {
        let m = ValidationMetrics::from_inputs(&ValidationInputs::default()).unwrap();
        assert_eq!(m, ValidationMetrics::default());
        assert_eq!(m.overall_reliability(), None);
    }

    #[test]
    fn test_correlation_based_scores() {
        let neg: Vec<f64> = A.iter().map(|x| -x).collect();
        let inputs = ValidationInputs {
            convergent: Some((&A, &neg)),
            discriminant: Some((&A, &A)),
            test_retest: Some((&A, &neg)),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert!((m.convergent_validity.unwrap() - 1.0).abs() < 1e-12);
        assert!(m.discriminant_validity.unwrap().abs() < 1e-12);
        assert_eq!(m.test_retest_reliability, Some(0.0));
    }

    #[test]
    fn test_discriminant_validity_for_unrelated_measures() {
        let r = stats::pearson_correlation(&B, &NOISE).unwrap();
        let inputs = ValidationInputs {
            discriminant: Some((&B, &NOISE)),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert!((m.discriminant_validity.unwrap() - (1.0 - r.abs())).abs() < 1e-12);
    }

    #[test]
    fn test_inter_rater_kappa() {
        let r1 = [true, true, false, false, true, false, true, false];
        let r2 = [true, true, false, false, true, false, false, true];
        // p_o = 0.75, p_e = 0.5 → κ = 0.5
        let inputs = ValidationInputs {
            inter_rater: Some((&r1, &r2)),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert!((m.inter_rater_reliability.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kappa_constant_raters() {
        assert_eq!(cohens_kappa(&[true; 4], &[true; 4]).unwrap(), 1.0);
        assert_eq!(cohens_kappa(&[true; 4], &[false; 4]).unwrap(), 0.0);
    }

    #[test]
    fn test_kappa_disagreement_is_clamped() {
        let r1 = [true, false, true, false];
        let r2 = [false, true, false, true];
        assert!(cohens_kappa(&r1, &r2).unwrap() < 0.0);
        let inputs = ValidationInputs {
            inter_rater: Some((&r1, &r2)),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert_eq!(m.inter_rater_reliability, Some(0.0));
    }

    #[test]
    fn test_predictive_accuracy() {
        let predicted = [0.9, 0.2, 0.6, 0.4];
        let outcomes = [true, false, false, false];
        assert!((predictive_accuracy(&predicted, &outcomes).unwrap() - 0.75).abs() < 1e-12);
        assert!(predictive_accuracy(&predicted, &outcomes[..2]).is_err());
    }

    #[test]
    fn test_cross_validation_and_overall() {
        let cv = CrossValidationSummary {
            mean: 0.42,
            std_dev: 0.05,
            fold_scores: vec![0.4, 0.45, 0.41],
        };
        let predicted = [0.9, 0.1];
        let outcomes = [true, false];
        let inputs = ValidationInputs {
            predictions: Some((&predicted, &outcomes)),
            convergent: Some((&A, &A)),
            cross_validation: Some(&cv),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert_eq!(m.cross_validation_score, Some(0.42));
        assert!((m.overall_reliability().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_input_errors() {
        let short = [1.0, 2.0];
        let inputs = ValidationInputs {
            convergent: Some((&A, &short)),
            ..Default::default()
        };
        assert!(matches!(
            ValidationMetrics::from_inputs(&inputs),
            Err(InferenceError::Domain(_))
        ));

        let single = [1.0];
        let inputs = ValidationInputs {
            test_retest: Some((&single, &single)),
            ..Default::default()
        };
        assert!(matches!(
            ValidationMetrics::from_inputs(&inputs),
            Err(InferenceError::InsufficientSampleSize { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_constant_series_leaves_score_undefined() {
        let flat = [1.0; 6];
        let inputs = ValidationInputs {
            convergent: Some((&A, &flat)),
            test_retest: Some((&flat, &flat)),
            discriminant: Some((&A, &B)),
            ..Default::default()
        };
        let m = ValidationMetrics::from_inputs(&inputs).unwrap();
        assert_eq!(m.convergent_validity, None);
        assert_eq!(m.test_retest_reliability, None);
        assert!(m.discriminant_validity.is_some());
    }
}
