// SPDX-License-Identifier: MPL-2.0
//! Player resource port definition.
//!
//! This module defines the [`PlayerBackend`] trait for the underlying
//! play/pause/seek resource of one content source. The embedding
//! application supplies the concrete implementation (a media framework
//! binding); the session layer only depends on this port.
//!
//! # Design Notes
//!
//! - One [`BackendHandle`] exists per session at a time; `dispose` takes
//!   it by value, so a second release is unrepresentable.
//! - Status events (`Ready`, `Failed`, `EndOfMedia`) are delivered
//!   asynchronously through the [`BackendListener`] registered at load
//!   time. Exactly one listener exists per handle.
//! - The playhead is shared lock-free state: the backend's transport
//!   writes it, the progress sampler reads it from its own task.

use super::fraction::Fraction;
use super::volume::Volume;
use crate::error::{LoadError, SeekError};
use crate::source::ContentSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Channel on which a backend reports status for one handle.
pub type BackendListener = mpsc::UnboundedSender<BackendEvent>;

/// Asynchronous status events emitted by a player backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The resource is ready and the media duration is resolved.
    Ready { duration: Duration },

    /// The resource failed to initialize or play.
    Failed { error: LoadError },

    /// Playback reached the end of the media.
    EndOfMedia,
}

/// Shared playhead for one loaded resource.
///
/// Position and duration are stored as microseconds in atomics so the
/// transport can update them from its own thread while the sampler reads
/// them without locking. A zero duration means "not yet known".
#[derive(Debug, Default)]
pub struct Playhead {
    position_us: AtomicU64,
    duration_us: AtomicU64,
}

pub type SharedPlayhead = Arc<Playhead>;

impl Playhead {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the current transport position.
    pub fn set_position(&self, position: Duration) {
        self.position_us
            .store(position.as_micros() as u64, Ordering::Relaxed);
    }

    /// Records the resolved media duration.
    pub fn set_duration(&self, duration: Duration) {
        self.duration_us
            .store(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Returns the current transport position.
    #[must_use]
    pub fn position(&self) -> Duration {
        Duration::from_micros(self.position_us.load(Ordering::Relaxed))
    }

    /// Returns the media duration, or `None` while it is unknown.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        let us = self.duration_us.load(Ordering::Relaxed);
        (us != 0).then(|| Duration::from_micros(us))
    }

    /// Returns position as a fraction of duration, or `None` while the
    /// duration is unknown.
    #[must_use]
    pub fn fraction(&self) -> Option<Fraction> {
        self.duration()
            .and_then(|duration| Fraction::from_position(self.position(), duration))
    }
}

/// Process-unique ids for backend handles.
static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to one loaded player resource.
///
/// Exclusively owned by one session; never shared or cloned. The handle
/// carries the shared playhead so the sampler can follow the transport.
#[derive(Debug)]
pub struct BackendHandle {
    id: u64,
    playhead: SharedPlayhead,
}

impl BackendHandle {
    /// Allocates a fresh handle with its own playhead.
    ///
    /// Called by backend implementations during `load`.
    #[must_use]
    pub fn allocate() -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            playhead: Arc::new(Playhead::new()),
        }
    }

    /// Returns the process-unique id of this handle.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns a clone of the shared playhead.
    #[must_use]
    pub fn playhead(&self) -> SharedPlayhead {
        Arc::clone(&self.playhead)
    }
}

/// Port for the underlying player resource of one content source.
///
/// Implementations must be `Send` so the session pump task can own them.
/// They are not required to be `Sync`; all calls arrive serialized from
/// the single controller that owns the handle.
///
/// # Lifecycle
///
/// 1. `load` allocates the resource and registers the status listener
/// 2. `play` / `pause` / `seek` / `set_volume` drive the transport
/// 3. `dispose` releases the resource, consuming the handle
pub trait PlayerBackend: Send {
    /// Allocates the underlying player resource for a content source.
    ///
    /// Must not panic on a malformed locator.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidSource`] for a malformed locator, or
    /// [`LoadError::Backend`] when the resource cannot be created at all.
    /// Failures discovered asynchronously are reported through the
    /// listener instead.
    fn load(
        &mut self,
        source: &ContentSource,
        listener: BackendListener,
    ) -> Result<BackendHandle, LoadError>;

    /// Starts or resumes the transport. No-op while already playing.
    fn play(&mut self, handle: &BackendHandle);

    /// Pauses the transport. No-op while already paused.
    fn pause(&mut self, handle: &BackendHandle);

    /// Repositions the transport to a fraction of the duration.
    ///
    /// # Errors
    ///
    /// Returns [`SeekError::DurationUnknown`] if the duration has not
    /// been resolved yet.
    fn seek(&mut self, handle: &BackendHandle, target: Fraction) -> Result<(), SeekError>;

    /// Applies the session's volume and mute state to the transport.
    fn set_volume(&mut self, handle: &BackendHandle, volume: Volume, muted: bool);

    /// Releases the resource. Consumes the handle: a session releases its
    /// resource exactly once.
    fn dispose(&mut self, handle: BackendHandle);
}
