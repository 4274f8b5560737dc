// SPDX-License-Identifier: MPL-2.0
//! Playback session state machine and observable snapshot.
//!
//! Manages the lifecycle of one player popup with clear state transitions:
//! - Idle: constructed, load not yet issued
//! - Loading: waiting for the player resource to become ready
//! - Ready: resource ready, playback not yet started
//! - Playing / Paused: active playback
//! - Seeking: user is scrubbing; remembers whether to resume on commit
//! - Ended: media finished; terminal for automatic progress updates
//! - Failed: load or resource failure; terminal, surfaced to the host

use super::fraction::Fraction;
use super::volume::Volume;
use crate::source::ContentSource;
use std::time::{Duration, Instant};

/// Lifecycle state of a playback session.
///
/// This enum represents all possible states of a session, ensuring
/// type-safe transitions via pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Session constructed; load has not been issued yet.
    Idle,

    /// Player resource allocation in flight.
    Loading,

    /// Resource is ready; waiting for playback to start.
    /// Transient under autoplay, stable otherwise.
    Ready,

    /// Media is playing.
    Playing,

    /// Playback paused at the current position.
    Paused,

    /// User is scrubbing. `resume` records whether playback continues
    /// after the seek commits.
    Seeking { resume: bool },

    /// Media reached the end. The host decides replay or close.
    Ended,

    /// Load or resource failure. Contains a display message.
    Failed { message: String },
}

impl SessionState {
    /// Returns true while media is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true while playback is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true while the user is scrubbing.
    #[must_use]
    pub fn is_seeking(&self) -> bool {
        matches!(self, Self::Seeking { .. })
    }

    /// Returns true once the session can accept playback gestures.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::Ready | Self::Playing | Self::Paused | Self::Seeking { .. }
        )
    }

    /// Returns true for states that end automatic progress updates.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Failed { .. })
    }

    /// Returns whether playback resumes after the current seek commits.
    ///
    /// `None` when not seeking.
    #[must_use]
    pub fn resume_after_seek(&self) -> Option<bool> {
        match self {
            Self::Seeking { resume } => Some(*resume),
            _ => None,
        }
    }

    /// Returns the failure message if the session failed.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Observable snapshot of one playback session.
///
/// The controller is the only writer; hosts receive clones through the
/// session's watch channel whenever state, progress, or controls
/// visibility change.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    /// What this session mounts, decided once at construction.
    pub source: ContentSource,

    /// Entitlement at construction time; immutable for the session.
    pub entitled: bool,

    /// Current lifecycle state.
    pub state: SessionState,

    /// Normalized playback progress; zero until the duration is known.
    pub progress: Fraction,

    /// Media duration, resolved when the resource becomes ready.
    pub duration: Option<Duration>,

    /// Whether the on-screen controls are currently shown.
    pub controls_visible: bool,

    /// Last user interaction, drives the auto-hide timer.
    pub last_interaction: Instant,

    /// Scrub target while the user is seeking; cleared on commit.
    pub pending_seek: Option<Fraction>,

    /// Current audio volume.
    pub volume: Volume,

    /// Whether audio is muted (volume level is preserved).
    pub muted: bool,
}

impl PlaybackSession {
    /// Creates the initial snapshot for a new session.
    #[must_use]
    pub fn new(source: ContentSource, entitled: bool, volume: Volume, muted: bool) -> Self {
        Self {
            source,
            entitled,
            state: SessionState::Idle,
            progress: Fraction::ZERO,
            duration: None,
            controls_visible: true,
            last_interaction: Instant::now(),
            pending_seek: None,
            volume,
            muted,
        }
    }
}
