//! Multiple-testing correction of p-value batches.
//!
//! Both corrections return a vector aligned with the input; an empty batch
//! comes back empty. Benjamini-Hochberg is never more conservative than
//! Bonferroni: `benjamini_hochberg(p)[i] ≤ bonferroni(p)[i]` for every `i`.
//!
//! # Examples
//!
//! ```
//! use u_evidence::correction::{benjamini_hochberg, bonferroni};
//!
//! let p = [0.01, 0.04, 0.03, 0.20];
//! let fwer = bonferroni(&p).unwrap();
//! let fdr = benjamini_hochberg(&p).unwrap();
//! assert_eq!(fwer.len(), 4);
//! assert!(fdr.iter().zip(&fwer).all(|(b, f)| b <= f));
//! ```

use crate::error::{InferenceError, Result};

fn check_p_values(p_values: &[f64]) -> Result<()> {
    if let Some(bad) = p_values.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(InferenceError::domain(format!(
            "p-values must lie in [0, 1], got {bad}"
        )));
    }
    Ok(())
}

/// Bonferroni family-wise error rate correction.
///
/// `adjusted[i] = min(1, p[i] · m)` where `m` is the batch size.
///
/// # Errors
/// [`InferenceError::Domain`] if any p-value is outside `[0, 1]` or NaN.
pub fn bonferroni(p_values: &[f64]) -> Result<Vec<f64>> {
    check_p_values(p_values)?;
    let m = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * m).min(1.0)).collect())
}

/// Benjamini-Hochberg false discovery rate correction.
///
/// # Algorithm
/// 1. Sort p-values ascending, keeping their original positions.
/// 2. From the largest rank down, `adjusted = p[rank] · m / rank`, taking
///    the running minimum so adjusted values are monotone in rank.
/// 3. Write each value back to its original position.
///
/// Reference: Benjamini & Hochberg (1995), "Controlling the False
/// Discovery Rate", *JRSS-B* 57(1), pp. 289–300.
///
/// # Errors
/// [`InferenceError::Domain`] if any p-value is outside `[0, 1]` or NaN.
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    check_p_values(p_values)?;
    let m = p_values.len();

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    let mut running_min = 1.0_f64;
    for (position, &original) in order.iter().enumerate().rev() {
        let rank = (position + 1) as f64;
        running_min = running_min.min(p_values[original] * m as f64 / rank);
        adjusted[original] = running_min;
    }
    Ok(adjusted)
}

// ============================================================================
// Tests
// ============================================================================
