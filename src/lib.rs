//! # u-evidence
//!
//! Statistical inference primitives for quantifying confidence in
//! discovered behavioral patterns.
//!
//! This crate turns raw numeric observations into quantified evidence:
//! confidence intervals and p-values, Bayesian posteriors with credible
//! intervals, multiple-comparison corrections, bootstrap and
//! cross-validation estimates, effect sizes and power calculations. It
//! knows nothing about where the observations come from.
//!
//! ## Modules
//!
//! - [`special`] — Error function, normal and Student-t quantiles, incomplete Beta
//! - [`stats`] — Descriptive statistics with numerical stability guarantees
//! - [`random`] — Seeded generators and resampling helpers
//! - [`interval`] — Confidence intervals and two-sided p-values
//! - [`bayes`] — Posterior probability of a tactic's effectiveness
//! - [`correction`] — Bonferroni and Benjamini-Hochberg adjustment
//! - [`resampling`] — Percentile bootstrap and k-fold cross-validation
//! - [`power`] — Cohen's d, power and required sample size
//! - [`validation`] — Reliability and validity score aggregation
//! - [`config`] — Tunable thresholds with documented defaults
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Reproducible randomness**: every stochastic operation takes a seeded
//!   generator, and parallel runs derive per-replicate seeds
//! - **Explicit failure**: invalid input is an [`InferenceError`], never a
//!   silent NaN
//! - **Property-based testing**: Mathematical invariants verified via proptest
//!
//! ## Features
//!
//! - `parallel` — bootstrap replicates and folds on the rayon pool
//! - `serde` — `Serialize`/`Deserialize` on result and configuration types

pub mod bayes;
pub mod config;
pub mod constants;
pub mod correction;
pub mod error;
pub mod interval;
pub mod power;
pub mod random;
pub mod resampling;
pub mod special;
pub mod stats;
pub mod validation;

pub use bayes::{analyze_tactic, BayesianTacticAnalysis};
pub use config::{BetaQuantileMethod, InferenceConfig};
pub use correction::{benjamini_hochberg, bonferroni};
pub use error::{InferenceError, Result};
pub use interval::{confidence_interval, StatisticalEvidence};
pub use power::{cohens_d, required_sample_size, statistical_power, EffectSize};
pub use resampling::{
    bootstrap_ci, bootstrap_ci_with_config, cross_validate, k_fold_splits, BootstrapInterval,
    CrossValidationSummary, FoldSplit,
};
pub use validation::{ValidationInputs, ValidationMetrics};
