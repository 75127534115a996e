//! Two-sample hypothesis tests.
//!
//! Welch's unequal-variance t-test, with or without the Welch–Satterthwaite
//! degrees of freedom. Sample sizes may differ between the two datasets.
//!
//! Reference: Welch (1947), "The generalization of 'Student's' problem when
//! several different population variances are involved", *Biometrika*
//! 34(1–2).

use crate::sample::Sample;
use crate::stats::{mean, sample_variance};

/// Result of [`t_test_welch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    /// The t statistic, `(x̄₁ − x̄₂) / √(s₁²/n₁ + s₂²/n₂)`.
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom, truncated toward zero.
    pub degrees_of_freedom: i32,
}

/// Welch's t statistic for two independent samples.
///
/// # Formula
/// ```text
/// t = (x̄₁ − x̄₂) / √(s₁²/n₁ + s₂²/n₂)
/// ```
/// where `s²` is the sample variance.
///
/// # Returns
/// IEEE results for degenerate input: two zero-variance datasets give
/// `NaN` (equal means) or `±∞`.
///
/// # Examples
/// ```
/// use u_statfn::inference::t_test_unequal_variances;
/// let a = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(t_test_unequal_variances(&a, &a), 0.0);
/// ```
pub fn t_test_unequal_variances<T: Sample>(data1: &[T], data2: &[T]) -> f64 {
    let term1 = sample_variance(data1) / data1.len() as f64;
    let term2 = sample_variance(data2) / data2.len() as f64;
    (mean(data1) - mean(data2)) / (term1 + term2).sqrt()
}

/// Welch's t-test returning both the t statistic and the approximate
/// degrees of freedom.
///
/// # Formula
/// ```text
/// vᵢ = sᵢ² / nᵢ
/// ν  = (v₁ + v₂)² / (v₁²/(n₁−1) + v₂²/(n₂−1))
/// ```
/// `ν` is truncated (not rounded) to an integer; `NaN` becomes `0`.
///
/// # Examples
/// ```
/// use u_statfn::inference::t_test_welch;
/// let r = t_test_welch(&[1, 2, 3, 4], &[2, 3, 4, 5, 6]);
/// assert!((r.t + 1.5666989036012806).abs() < 1e-12);
/// assert_eq!(r.degrees_of_freedom, 6); // ν ≈ 6.98
/// ```
pub fn t_test_welch<T: Sample>(data1: &[T], data2: &[T]) -> WelchTest {
    let n1 = data1.len() as f64;
    let n2 = data2.len() as f64;
    let term1 = sample_variance(data1) / n1;
    let term2 = sample_variance(data2) / n2;
    let term_sum = term1 + term2;
    let v_denom = term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0);
    let v = term_sum * term_sum / v_denom;
    WelchTest {
        t: (mean(data1) - mean(data2)) / term_sum.sqrt(),
        degrees_of_freedom: v as i32,
    }
}
