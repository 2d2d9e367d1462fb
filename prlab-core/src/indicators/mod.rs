//! Statistics derived from the merged table for reporting.

pub mod rolling;
pub mod trailing;

pub use rolling::{pr_rolling_mean, RollingMean};
pub use trailing::{trailing_pr_averages, TrailingAverage};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
