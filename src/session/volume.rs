// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for session audio.
//!
//! This module provides a type-safe wrapper for volume values, ensuring
//! they are always within the valid range (0.0–1.0).

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME, VOLUME_STEP};

/// Volume level, guaranteed to be within valid range (0.0–1.0).
///
/// Muting is a separate flag on the session so that unmuting restores the
/// previous level; a `Volume` value itself is never used as a mute state.
///
/// # Example
///
/// ```
/// use paddock_player::session::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(2.0);
/// assert_eq!(too_loud.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if the level is below the audible threshold.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 < 0.001
    }

    /// Increases volume by one step, clamping to maximum.
    #[must_use]
    pub fn increase(self) -> Self {
        Self::new(self.0 + VOLUME_STEP)
    }

    /// Decreases volume by one step, clamping to minimum.
    #[must_use]
    pub fn decrease(self) -> Self {
        Self::new(self.0 - VOLUME_STEP)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}
