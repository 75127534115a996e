//! Descriptive statistics over integer or real datasets.
//!
//! Every function is generic over [`Sample`], so `&[i32]` and `&[f64]`
//! inputs run the same code and give the same answer for equal values.
//!
//! # Algorithms
//!
//! - **Variance**: shifted sums around the computed mean,
//!   `(Σd² − (Σd)²/n) / divisor` with `d = x − x̄`. The second term removes
//!   the residual error of `x̄` itself.
//!   Reference: Chan, Golub & LeVeque (1983), "Algorithms for Computing
//!   the Sample Variance", *The American Statistician* 37(3).
//! - **Covariance**: sums of deviations from the first element of each
//!   series, which avoids the cancellation of the textbook
//!   `E[XY] − E[X]E[Y]` form.
//! - **Correlation**: evaluated in log space,
//!   `sign(cov) · exp(ln|cov| − ½ ln σ²ₓ − ½ ln σ²ᵧ)`, so large variances
//!   never overflow an intermediate product.
//!
//! # Degenerate inputs
//!
//! Datasets with fewer than two samples have variance, covariance and
//! correlation `0.0`. Correlation is also `0.0` whenever either variance
//! or the covariance is exactly zero.

use crate::error::{Result, StatsError};
use crate::sample::Sample;

/// Computes the arithmetic mean.
///
/// # Returns
/// `NaN` for an empty slice.
///
/// # Examples
/// ```
/// use u_statfn::stats::mean;
/// assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
/// ```
pub fn mean<T: Sample>(data: &[T]) -> f64 {
    let sum: f64 = data.iter().map(|&e| e.to_f64()).sum();
    sum / data.len() as f64
}

/// Computes the population variance (divisor `n`).
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// `0.0` if `data.len() < 2`.
///
/// # Examples
/// ```
/// use u_statfn::stats::variance;
/// assert_eq!(variance(&[1, 2, 3, 4]), 1.25);
/// assert_eq!(variance(&[7.0]), 0.0);
/// ```
pub fn variance<T: Sample>(data: &[T]) -> f64 {
    shifted_variance(data, data.len() as f64)
}

/// Computes the sample variance (divisor `n − 1`).
///
/// # Returns
/// `0.0` if `data.len() < 2`.
///
/// # Examples
/// ```
/// use u_statfn::stats::sample_variance;
/// let v = sample_variance(&[1.0, 2.0, 3.0, 4.0]);
/// assert!((v - 5.0 / 3.0).abs() < 1e-15);
/// ```
pub fn sample_variance<T: Sample>(data: &[T]) -> f64 {
    shifted_variance(data, data.len() as f64 - 1.0)
}

/// Computes the sample standard deviation, `sqrt(sample_variance(data))`.
///
/// # Examples
/// ```
/// use u_statfn::stats::std_dev;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((std_dev(&v) - 2.138089935299395).abs() < 1e-12);
/// ```
pub fn std_dev<T: Sample>(data: &[T]) -> f64 {
    sample_variance(data).sqrt()
}

fn shifted_variance<T: Sample>(data: &[T], divisor: f64) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let mut sum_squares = 0.0;
    let mut sum = 0.0;
    for &e in data {
        let d = e.to_f64() - m;
        sum_squares += d * d;
        sum += d;
    }
    (sum_squares - sum * sum / data.len() as f64) / divisor
}

/// Computes the population covariance of two paired datasets.
///
/// # Formula
/// ```text
/// Cov(X, Y) = (Σ ΔxᵢΔyᵢ − Σ Δxᵢ · Σ Δyᵢ / n) / n,   Δxᵢ = xᵢ − x₀, Δyᵢ = yᵢ − y₀
/// ```
///
/// # Errors
/// [`StatsError::LengthMismatch`] if `x.len() != y.len()`.
///
/// # Returns
/// `0.0` if the datasets have fewer than two samples.
///
/// # Examples
/// ```
/// use u_statfn::stats::covariance;
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [2.0, 4.0, 6.0, 8.0];
/// assert_eq!(covariance(&x, &y).unwrap(), 2.5);
/// assert!(covariance(&x, &y[..3]).is_err());
/// ```
pub fn covariance<T: Sample>(x: &[T], y: &[T]) -> Result<f64> {
    ensure_paired(x, y)?;
    let n = x.len();
    if n < 2 {
        return Ok(0.0);
    }
    let kx = x[0].to_f64();
    let ky = y[0].to_f64();
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_product = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi.to_f64() - kx;
        let dy = yi.to_f64() - ky;
        sum_x += dx;
        sum_y += dy;
        sum_product += dx * dy;
    }
    let nf = n as f64;
    Ok((sum_product - sum_x * sum_y / nf) / nf)
}

/// Computes Pearson's correlation coefficient of two paired datasets.
///
/// # Errors
/// [`StatsError::LengthMismatch`] if `x.len() != y.len()`.
///
/// # Returns
/// `0.0` if either variance or the covariance is exactly zero.
///
/// # Examples
/// ```
/// use u_statfn::stats::correlation;
/// let x = [1, 2, 3, 4];
/// assert_eq!(correlation(&x, &x).unwrap(), 1.0);
/// assert_eq!(correlation(&x, &[4, 3, 2, 1]).unwrap(), -1.0);
/// assert_eq!(correlation(&x, &[5, 5, 5, 5]).unwrap(), 0.0);
/// ```
pub fn correlation<T: Sample>(x: &[T], y: &[T]) -> Result<f64> {
    ensure_paired(x, y)?;
    let var_x = variance(x);
    if var_x == 0.0 {
        log::trace!("correlation: first dataset has zero variance");
        return Ok(0.0);
    }
    let var_y = variance(y);
    if var_y == 0.0 {
        log::trace!("correlation: second dataset has zero variance");
        return Ok(0.0);
    }
    let cov = covariance(x, y)?;
    if cov == 0.0 {
        log::trace!("correlation: zero covariance");
        return Ok(0.0);
    }
    Ok(log_space_correlation(var_x, var_y, cov))
}

fn log_space_correlation(var_x: f64, var_y: f64, cov: f64) -> f64 {
    let r = (cov.abs().ln() - 0.5 * var_x.ln() - 0.5 * var_y.ln()).exp();
    if cov < 0.0 {
        -r
    } else {
        r
    }
}

/// Computes the correlation matrix of `k` variables.
///
/// `data[i]` holds the samples of variable `i`. Entry `[i][j]` of the
/// result is `correlation(data[i], data[j])`; the diagonal is exactly
/// `1.0` and only the `k(k−1)/2` upper-triangle pairs are computed.
///
/// # Errors
/// [`StatsError::LengthMismatch`] if two rows differ in length.
///
/// # Examples
/// ```
/// use u_statfn::stats::correlation_matrix;
/// let data = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
/// let m = correlation_matrix(&data).unwrap();
/// assert_eq!(m[0][0], 1.0);
/// assert_eq!(m[0][1], m[1][0]);
/// ```
pub fn correlation_matrix<T, R>(data: &[R]) -> Result<Vec<Vec<f64>>>
where
    T: Sample,
    R: AsRef<[T]>,
{
    let k = data.len();
    let mut corr = vec![vec![0.0; k]; k];
    for i in 0..k {
        corr[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = correlation(data[i].as_ref(), data[j].as_ref())?;
            corr[i][j] = r;
            corr[j][i] = r;
        }
    }
    Ok(corr)
}

fn ensure_paired<T>(x: &[T], y: &[T]) -> Result<()> {
    if x.len() != y.len() {
        log::debug!(
            "rejecting paired datasets of lengths {} and {}",
            x.len(),
            y.len()
        );
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
