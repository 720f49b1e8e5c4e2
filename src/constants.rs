//! Named defaults shared across the crate.

/// Minimum number of observations for interval estimation.
pub const MIN_SAMPLE_SIZE: usize = 10;

/// Smallest p-value ever reported. A true zero is meaningless for a
/// continuous test statistic.
pub const P_VALUE_FLOOR: f64 = 1e-10;

/// Pseudo-observations carried by the prior in the Beta-conjugate update.
pub const PRIOR_STRENGTH: f64 = 10.0;

/// Likelihood of the evidence under the "no tactic" hypothesis (indifference).
pub const NULL_LIKELIHOOD: f64 = 0.5;

/// Default number of bootstrap replicates.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 1000;

/// Upper bound of the required-sample-size search. Returned when the
/// target power is unreachable.
pub const MAX_SEARCH_SAMPLE_SIZE: usize = 10_000;

/// Smallest sample size considered by the required-sample-size search.
pub const MIN_SEARCH_SAMPLE_SIZE: usize = 3;

/// Default two-sided confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Default significance level for power analysis.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default target power for sample-size planning.
pub const DEFAULT_POWER: f64 = 0.8;

/// Degrees of freedom at and above which the t critical value is taken
/// from the normal quantile directly.
pub const LARGE_DF: f64 = 30.0;
