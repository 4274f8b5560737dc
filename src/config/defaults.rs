// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for playback configuration constants.
//!
//! This module is the single source of truth for default values used
//! across the playback subsystem. Constants are organized by category.
//!
//! # Categories
//!
//! - **Controls**: Auto-hide timing for on-screen controls
//! - **Progress**: Playback position sampling cadence
//! - **Volume**: Audio playback volume settings

// ==========================================================================
// Controls Defaults
// ==========================================================================

/// Default delay before on-screen controls auto-hide during playback (milliseconds).
pub const DEFAULT_AUTO_HIDE_DELAY_MS: u64 = 3_000;

/// Minimum auto-hide delay (milliseconds).
pub const MIN_AUTO_HIDE_DELAY_MS: u64 = 1_000;

/// Maximum auto-hide delay (milliseconds).
pub const MAX_AUTO_HIDE_DELAY_MS: u64 = 30_000;

// ==========================================================================
// Progress Defaults
// ==========================================================================

/// Default interval between playback progress samples (milliseconds).
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 500;

/// Minimum progress sampling interval (milliseconds).
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 100;

/// Maximum progress sampling interval (milliseconds).
pub const MAX_SAMPLE_INTERVAL_MS: u64 = 5_000;

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume adjustment step for increase/decrease operations.
pub const VOLUME_STEP: f32 = 0.1;
