// SPDX-License-Identifier: MPL-2.0
//! Per-session event pump.
//!
//! Each playback session runs as one tokio task that owns the controller
//! and serializes every input into it: gestures arriving through the
//! [`SessionHandle`], status events from the backend listener, and the
//! timer/sampler callbacks that come back through the same queue. No two
//! inputs are ever applied concurrently, so the controller needs no
//! locks.
//!
//! Observers receive [`PlaybackSession`] snapshots through a watch
//! channel. When the last observer (and handle) is dropped, the pump
//! closes the session on its own, so the resource bundle is released on
//! every exit path.

use super::backend::PlayerBackend;
use super::controller::{Effect, SessionController, SessionEvent, SessionOptions};
use super::fraction::Fraction;
use super::state::PlaybackSession;
use super::volume::Volume;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Spawns the pump task for one session and returns its handle.
///
/// The controller issues the backend load immediately; the first
/// snapshot observers see is already `Loading` (or `Failed` when the
/// resource could not be created at all).
pub fn spawn(backend: Box<dyn PlayerBackend>, options: SessionOptions) -> SessionHandle {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (backend_tx, mut backend_rx) = mpsc::unbounded_channel();

    let mut controller = SessionController::new(backend, options, events_tx.clone());
    let (watch_tx, watch_rx) = watch::channel(controller.session().clone());

    tokio::spawn(async move {
        if controller.start(backend_tx) != Effect::None {
            let _ = watch_tx.send(controller.session().clone());
        }

        loop {
            let event = tokio::select! {
                Some(event) = events_rx.recv() => event,
                Some(event) = backend_rx.recv() => SessionEvent::Backend(event),
                () = watch_tx.closed() => {
                    debug!("all session observers dropped; closing");
                    SessionEvent::Close
                }
                else => break,
            };

            match controller.handle_event(event) {
                Effect::None => {}
                Effect::Publish => {
                    let _ = watch_tx.send(controller.session().clone());
                }
                Effect::Shutdown => {
                    let _ = watch_tx.send(controller.session().clone());
                    break;
                }
            }
        }
        // Dropping the controller is the backstop release for abnormal
        // exits; a normal Close has already disposed the bundle.
    });

    SessionHandle {
        events: events_tx,
        snapshots: watch_rx,
    }
}

/// Handle for driving one playback session from the host.
///
/// Gesture methods are fire-and-forget: after the session is disposed
/// they become no-ops rather than errors, so a racing host never
/// observes a spurious failure.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    snapshots: watch::Receiver<PlaybackSession>,
}

impl SessionHandle {
    fn send(&self, event: SessionEvent) {
        // Session may already be gone; gestures after dispose are no-ops.
        let _ = self.events.send(event);
    }

    /// Tap on the player surface: show or hide the controls.
    pub fn toggle_controls(&self) {
        self.send(SessionEvent::ToggleControls);
    }

    /// Tap on the play/pause button.
    pub fn toggle_play_pause(&self) {
        self.send(SessionEvent::TogglePlayPause);
    }

    /// Scrub gesture started on the seek bar.
    pub fn begin_seek(&self) {
        self.send(SessionEvent::BeginSeek);
    }

    /// Scrub position moved.
    pub fn update_seek(&self, target: Fraction) {
        self.send(SessionEvent::UpdateSeek(target));
    }

    /// Scrub gesture released.
    pub fn commit_seek(&self) {
        self.send(SessionEvent::CommitSeek);
    }

    /// Volume slider moved.
    pub fn set_volume(&self, volume: Volume) {
        self.send(SessionEvent::SetVolume(volume));
    }

    /// Mute button tapped.
    pub fn toggle_mute(&self) {
        self.send(SessionEvent::ToggleMute);
    }

    /// Closes the popup: disposes the session.
    pub fn close(&self) {
        self.send(SessionEvent::Close);
    }

    /// Returns the latest observable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSession {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver that observes every published snapshot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.snapshots.clone()
    }

    /// Returns true while the session pump is still running.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.events.is_closed()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
