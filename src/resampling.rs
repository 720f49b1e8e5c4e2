//! Bootstrap confidence intervals and k-fold cross-validation.
//!
//! Both procedures are generic over caller-supplied closures and take an
//! explicit random generator. One base seed is drawn from that generator;
//! bootstrap replicate `i` then runs on its own sub-generator seeded with
//! [`derive_seed`]`(base, i)`. Replicates and folds never share mutable
//! state, and results are reduced only after every unit has finished, so
//! output is identical with or without the `parallel` feature.
//!
//! # Features
//!
//! - `parallel`: run replicates and folds on the rayon thread pool.

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::InferenceConfig;
use crate::error::{check_finite, InferenceError, Result};
use crate::random::{create_rng, derive_seed, resample_with_replacement, shuffled_indices};
use crate::stats::{self, WelfordAccumulator};

// ============================================================================
// Bootstrap
// ============================================================================

/// Percentile bootstrap interval for a scalar statistic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapInterval {
    /// Statistic evaluated on the original data.
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
    pub iterations: usize,
}

impl BootstrapInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Percentile bootstrap confidence interval.
///
/// Draws `iterations` same-size samples with replacement, evaluates
/// `statistic` on each, and reads the `α/2` and `1 − α/2` empirical
/// quantiles (R-7) of the sorted replicates. The caller's `data` is never
/// modified.
///
/// # Errors
/// - [`InferenceError::InsufficientSampleSize`] for empty data.
/// - [`InferenceError::Domain`] for zero iterations, a confidence outside
///   `(0, 1)`, non-finite data, or a statistic returning a non-finite value.
///
/// # Examples
/// ```
/// use u_evidence::random::create_rng;
/// use u_evidence::resampling::bootstrap_ci;
/// use u_evidence::stats::mean;
///
/// let data: Vec<f64> = (1..=10).map(f64::from).collect();
/// let mut rng = create_rng(42);
/// let ci = bootstrap_ci(&data, |s| mean(s).unwrap_or(f64::NAN), 1000, 0.95, &mut rng).unwrap();
/// assert!(ci.contains(5.5));
/// ```
pub fn bootstrap_ci<F, R>(
    data: &[f64],
    statistic: F,
    iterations: usize,
    confidence: f64,
    rng: &mut R,
) -> Result<BootstrapInterval>
where
    F: Fn(&[f64]) -> f64 + Sync,
    R: Rng,
{
    let config = InferenceConfig::default()
        .with_bootstrap_iterations(iterations)
        .with_confidence(confidence);
    bootstrap_ci_with_config(data, statistic, rng, &config)
}

/// Percentile bootstrap with `config.bootstrap_iterations` replicates at
/// `config.confidence` (1000 and 0.95 by default).
///
/// # Errors
/// As [`bootstrap_ci`]; an invalid config is [`InferenceError::Domain`].
pub fn bootstrap_ci_with_config<F, R>(
    data: &[f64],
    statistic: F,
    rng: &mut R,
    config: &InferenceConfig,
) -> Result<BootstrapInterval>
where
    F: Fn(&[f64]) -> f64 + Sync,
    R: Rng,
{
    config.validate()?;
    let iterations = config.bootstrap_iterations;
    let confidence = config.confidence;
    if data.is_empty() {
        return Err(InferenceError::InsufficientSampleSize {
            required: 1,
            actual: 0,
        });
    }
    check_finite("sample", data)?;

    let estimate = statistic(data);
    let base_seed: u64 = rng.random();
    let replicate = |i: usize| {
        let mut local = create_rng(derive_seed(base_seed, i as u64));
        let sample = resample_with_replacement(data, &mut local);
        statistic(&sample)
    };

    #[cfg(feature = "parallel")]
    let mut replicates: Vec<f64> = (0..iterations).into_par_iter().map(replicate).collect();

    #[cfg(not(feature = "parallel"))]
    let mut replicates: Vec<f64> = (0..iterations).map(replicate).collect();

    check_finite("bootstrap replicates", &replicates)?;
    replicates.sort_by(|a, b| a.total_cmp(b));

    let alpha = 1.0 - confidence;
    let bound = |p: f64| {
        stats::quantile_sorted(&replicates, p)
            .ok_or_else(|| InferenceError::domain("empty bootstrap distribution"))
    };
    let lower = bound(alpha / 2.0)?;
    let upper = bound(1.0 - alpha / 2.0)?;

    tracing::debug!(iterations, lower, upper, "bootstrap interval");

    Ok(BootstrapInterval {
        estimate,
        lower,
        upper,
        confidence,
        iterations,
    })
}

// ============================================================================
// K-fold Cross-validation
// ============================================================================

/// Index partition for one fold. `train` and `test` are disjoint and
/// together cover every observation exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Aggregate of per-fold scores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossValidationSummary {
    pub mean: f64,
    /// Sample standard deviation of the fold scores.
    pub std_dev: f64,
    /// Scores in fold order.
    pub fold_scores: Vec<f64>,
}

/// Shuffles `0..n` once and cuts it into `k` contiguous folds.
///
/// Every fold holds `n / k` indices except the last, which also absorbs
/// the remainder.
///
/// # Errors
/// [`InferenceError::InvalidFoldCount`] unless `2 ≤ k ≤ n`.
///
/// # Examples
/// ```
/// use u_evidence::random::create_rng;
/// use u_evidence::resampling::k_fold_splits;
///
/// let splits = k_fold_splits(10, 3, &mut create_rng(1)).unwrap();
/// assert_eq!(splits.len(), 3);
/// assert_eq!(splits[2].test.len(), 4);
/// assert!(splits.iter().all(|s| s.train.len() + s.test.len() == 10));
/// ```
pub fn k_fold_splits<R: Rng>(n: usize, k: usize, rng: &mut R) -> Result<Vec<FoldSplit>> {
    if k < 2 || k > n {
        return Err(InferenceError::InvalidFoldCount {
            folds: k,
            observations: n,
        });
    }
    let order = shuffled_indices(n, rng);
    let fold_size = n / k;

    Ok((0..k)
        .map(|fold| {
            let start = fold * fold_size;
            let end = if fold == k - 1 { n } else { start + fold_size };
            FoldSplit {
                train: order[..start].iter().chain(&order[end..]).copied().collect(),
                test: order[start..end].to_vec(),
            }
        })
        .collect())
}

/// K-fold cross-validation of an arbitrary train/test procedure.
///
/// For each fold `train` receives a fresh copy of the complement and
/// `test` receives the trained model with a copy of the held-out fold.
/// The caller's data is never handed out directly.
///
/// # Errors
/// - [`InferenceError::InvalidFoldCount`] unless `2 ≤ k ≤ data.len()`.
/// - [`InferenceError::Domain`] if a fold score is non-finite.
///
/// # Examples
/// ```
/// use u_evidence::random::create_rng;
/// use u_evidence::resampling::cross_validate;
/// use u_evidence::stats::mean;
///
/// let data: Vec<f64> = (0..20).map(|i| (i % 4) as f64).collect();
/// let summary = cross_validate(
///     &data,
///     5,
///     |train| mean(train).unwrap_or(0.0),
///     |model, test| test.iter().map(|x| (x - model).abs()).sum::<f64>() / test.len() as f64,
///     &mut create_rng(3),
/// )
/// .unwrap();
/// assert_eq!(summary.fold_scores.len(), 5);
/// ```
pub fn cross_validate<T, M, Train, Test, R>(
    data: &[T],
    k: usize,
    train: Train,
    test: Test,
    rng: &mut R,
) -> Result<CrossValidationSummary>
where
    T: Clone + Send + Sync,
    Train: Fn(&[T]) -> M + Sync,
    Test: Fn(&M, &[T]) -> f64 + Sync,
    R: Rng,
{
    let splits = k_fold_splits(data.len(), k, rng)?;
    let gather = |indices: &[usize]| -> Vec<T> { indices.iter().map(|&i| data[i].clone()).collect() };
    let run_fold = |split: &FoldSplit| {
        let model = train(&gather(&split.train));
        test(&model, &gather(&split.test))
    };

    #[cfg(feature = "parallel")]
    let fold_scores: Vec<f64> = splits.par_iter().map(run_fold).collect();

    #[cfg(not(feature = "parallel"))]
    let fold_scores: Vec<f64> = splits.iter().map(run_fold).collect();

    check_finite("fold scores", &fold_scores)?;

    let mut acc = WelfordAccumulator::new();
    fold_scores.iter().for_each(|&s| acc.update(s));
    let mean = acc
        .mean()
        .ok_or_else(|| InferenceError::domain("no fold scores"))?;
    let std_dev = acc.sample_std_dev().unwrap_or(0.0);

    tracing::debug!(folds = k, mean, std_dev, "cross-validation complete");

    Ok(CrossValidationSummary {
        mean,
        std_dev,
        fold_scores,
    })
}

// ============================================================================
// Tests
// ============================================================================
