//! Descriptive statistics shared by the inference components.
//!
//! All functions return `None` instead of panicking on empty or non-finite
//! input; the components translate that into a typed
//! [`InferenceError`](crate::error::InferenceError).
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation.
//! - **Variance**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Quantile**: R-7 linear interpolation on sorted data.
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).

/// Arithmetic mean with compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_evidence::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Unbiased sample variance (denominator `n − 1`).
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_evidence::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    data.iter().for_each(|&x| acc.update(x));
    acc.sample_variance()
}

/// Sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// `p`-th quantile of **pre-sorted** data (R-7 method).
///
/// The caller guarantees `sorted_data` is in non-decreasing order.
///
/// # Returns
/// - `None` if `sorted_data` is empty or `p` is outside `[0, 1]`.
///
/// # Examples
/// ```
/// use u_evidence::stats::quantile_sorted;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile_sorted(&data, 0.5), Some(3.0));
/// assert_eq!(quantile_sorted(&data, 0.25), Some(2.0));
/// ```
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some((1.0 - g) * sorted_data[j] + g * sorted_data[j + 1])
    }
}

/// Pearson product-moment correlation coefficient.
///
/// # Returns
/// - `None` if lengths differ, fewer than 2 pairs, non-finite values, or
///   either series is constant.
///
/// # Examples
/// ```
/// use u_evidence::stats::pearson_correlation;
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [2.0, 4.0, 6.0, 8.0];
/// assert!((pearson_correlation(&x, &y).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Neumaier compensated summation.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik und
/// Mechanik* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Streaming mean and variance accumulator.
///
/// Used to summarise per-fold and per-replicate results; [`merge`]
/// combines partial accumulators independent of the order in which they
/// finished.
///
/// [`merge`]: WelfordAccumulator::merge
///
/// # Examples
/// ```
/// use u_evidence::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample variance (n − 1 denominator), `None` below 2 samples.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Chan et al. (1979) pairwise merge.
    pub fn merge(&mut self, other: &WelfordAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;
        let delta = other.mean - self.mean;
        self.mean += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count += other.count;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_rejects_bad_input() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, f64::NAN]), None);
        assert_eq!(mean(&[1.0, f64::INFINITY]), None);
    }

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
        assert!(variance(&[5.0; 20]).unwrap().abs() < 1e-15);
        assert_eq!(variance(&[1.0]), None);
    }

    #[test]
    fn test_variance_one_to_ten() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        assert!((variance(&data).unwrap() - 55.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let data = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(quantile_sorted(&data, 0.0), Some(10.0));
        assert_eq!(quantile_sorted(&data, 1.0), Some(40.0));
        assert!((quantile_sorted(&data, 0.5).unwrap() - 25.0).abs() < 1e-12);
        assert_eq!(quantile_sorted(&data, 1.5), None);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_pearson_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert!((pearson_correlation(&x, &y).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson_correlation(&x, &[1.0; 5]), None);
        assert_eq!(pearson_correlation(&x, &y[..3]), None);
    }

    #[test]
    fn test_kahan_sum_compensates() {
        let data = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(kahan_sum(&data), 2.0);
    }

    #[test]
    fn test_welford_merge_matches_single_pass() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let mut whole = WelfordAccumulator::new();
        data.iter().for_each(|&x| whole.update(x));

        let mut left = WelfordAccumulator::new();
        let mut right = WelfordAccumulator::new();
        data[..17].iter().for_each(|&x| left.update(x));
        data[17..].iter().for_each(|&x| right.update(x));
        right.merge(&left);

        assert_eq!(right.count(), 50);
        assert!((right.mean().unwrap() - whole.mean().unwrap()).abs() < 1e-12);
        assert!(
            (right.sample_variance().unwrap() - whole.sample_variance().unwrap()).abs() < 1e-10
        );
    }

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.sample_variance(), None);
    }
}
