// SPDX-License-Identifier: MPL-2.0
//! Normalized playback progress domain type.
//!
//! Progress and seek targets travel through the session as fractions of
//! the media duration, guaranteed to be within [0.0, 1.0]. This newtype
//! enforces validity at the type level so the controller never has to
//! re-check for NaN or out-of-range values.

use std::time::Duration;

/// A playback position as a fraction of the media duration, in [0.0, 1.0].
///
/// # Example
///
/// ```
/// use paddock_player::session::Fraction;
///
/// let half = Fraction::new(0.5);
/// assert_eq!(half.value(), 0.5);
///
/// // Values outside the range are clamped
/// assert_eq!(Fraction::new(1.7), Fraction::COMPLETE);
/// assert_eq!(Fraction::new(-0.2), Fraction::ZERO);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
    /// The start of the media.
    pub const ZERO: Fraction = Fraction(0.0);

    /// The end of the media.
    pub const COMPLETE: Fraction = Fraction(1.0);

    /// Creates a fraction, clamping to [0.0, 1.0]. NaN becomes 0.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the fraction as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true if this fraction is at (or past) the end of the media.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }

    /// Converts an absolute position into a fraction of the duration.
    ///
    /// Returns `None` while the duration is unknown (zero), so callers can
    /// skip a sample instead of producing a meaningless value.
    #[must_use]
    pub fn from_position(position: Duration, duration: Duration) -> Option<Self> {
        if duration.is_zero() {
            return None;
        }
        Some(Self::new(position.as_secs_f64() / duration.as_secs_f64()))
    }

    /// Converts this fraction back to an absolute position in the media.
    #[must_use]
    pub fn to_position(self, duration: Duration) -> Duration {
        duration.mul_f64(self.0)
    }
}
