//! Shared numeric utilities for recalculation and tolerance comparison.
//!
//! The whole engine operates on one representation, binary `f64`, so that
//! the recompute side and the compare side always see the same rounding.

use thiserror::Error;

/// Arithmetic failure inside a single formula, before record/formula
/// context is attached by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Division that treats a zero denominator as an input-data error rather
/// than silently producing infinity.
#[inline]
pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64, ArithmeticError> {
    if denominator == 0.0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    Ok(numerator / denominator)
}

/// Tolerance comparison policy: strict `>` on the absolute difference.
///
/// An exact match has difference zero, which never exceeds a non-negative
/// tolerance, so exact equality passes even at tolerance zero.
#[inline]
pub fn exceeds_tolerance(expected: f64, actual: f64, tolerance: f64) -> bool {
    (expected - actual).abs() > tolerance
}

/// Mixed relative/absolute closeness test for the transfer-fee check:
/// `|actual - expected| <= atol + rtol * |expected|`.
///
/// This is the one comparison in the crate that is not a plain absolute
/// difference; transfer fees scale with the transfer amount, so the
/// acceptable error scales with the recomputed fee.
#[inline]
pub fn is_close(actual: f64, expected: f64, rtol: f64, atol: f64) -> bool {
    (actual - expected).abs() <= atol + rtol * expected.abs()
}
