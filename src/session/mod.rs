// SPDX-License-Identifier: MPL-2.0
//! Playback session engine for Paddock.
//!
//! One session per opened player popup: an event-driven state machine
//! fed by user gestures, backend status events, a single auto-hide
//! timer, and a periodic progress sampler, all serialized through one
//! per-session queue.

pub mod backend;
mod controller;
mod fraction;
mod runtime;
mod sampler;
mod state;
mod timer;
mod volume;

pub use backend::{
    BackendEvent, BackendHandle, BackendListener, Playhead, PlayerBackend, SharedPlayhead,
};
pub use controller::{Effect, SessionController, SessionEvent, SessionOptions};
pub use fraction::Fraction;
pub use runtime::{spawn, SessionHandle};
pub use sampler::ProgressSampler;
pub use state::{PlaybackSession, SessionState};
pub use timer::HideTimer;
pub use volume::Volume;
