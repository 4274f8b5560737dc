// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for float assertions in tests.
//!
//! Progress fractions and volume levels are floats; the `approx`
//! assertion macros compare them without tripping over representation
//! error the way `assert_eq!` does.

// Re-export approx macros for convenient use in tests
pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Epsilon for f64 fraction comparisons that should be "exactly equal"
/// up to floating-point error.
pub const F64_EPSILON: f64 = 1e-10;
