//! Error types for u-statfn.

use thiserror::Error;

/// Result type alias using [`StatsError`].
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors raised by the special functions and estimators.
///
/// Variants fall into two categories: domain errors (an argument value the
/// function is not defined for) and numerical non-convergence. Degenerate
/// inputs such as datasets shorter than two samples are not errors; they
/// yield `0.0` by policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The incomplete beta function argument lies outside `[0, 1]`.
    #[error("x must be in [0.0, 1.0], got {x}")]
    OutOfUnitInterval {
        /// The rejected argument
        x: f64,
    },

    /// Two datasets that must be paired sample-by-sample differ in length.
    #[error("datasets must have the same length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first dataset
        left: usize,
        /// Length of the second dataset
        right: usize,
    },

    /// A continued fraction did not meet its tolerance within the iteration cap.
    #[error("continued fraction failed to converge after {iterations} iterations")]
    NoConvergence {
        /// Iterations performed before giving up
        iterations: usize,
    },
}

impl StatsError {
    /// Returns `true` for invalid-argument errors.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            StatsError::OutOfUnitInterval { .. } | StatsError::LengthMismatch { .. }
        )
    }

    /// Returns `true` if an iterative evaluation gave up.
    pub fn is_convergence(&self) -> bool {
        matches!(self, StatsError::NoConvergence { .. })
    }
}
