//! # u-statfn
//!
//! Special functions and statistical estimators for randomization
//! algorithms and empirical performance comparison.
//!
//! This crate provides double-precision building blocks that are
//! domain-agnostic. It knows nothing about samplers, benchmarks, or any
//! consumer domain; callers hand in read-only datasets and get numbers back.
//!
//! ## Modules
//!
//! - [`special`] — ln Γ, the regularized incomplete beta function and its
//!   continued fraction, Horner polynomial evaluation
//! - [`stats`] — mean, variance family, covariance, correlation and
//!   correlation matrices
//! - [`inference`] — Welch's unequal-variance t-test
//! - [`sample`] — the numeric element types datasets may hold
//! - [`error`] — domain and convergence errors
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: no state survives a call, everything is safe to
//!   call concurrently
//! - **Explicit failure**: invalid arguments and non-convergence are
//!   errors, never a silently wrong value
//! - **One algorithm per estimator**: integer and real datasets share the
//!   same generic code path
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod error;
pub mod inference;
pub mod sample;
pub mod special;
pub mod stats;

pub use error::{Result, StatsError};
pub use inference::WelchTest;
pub use sample::Sample;
