// SPDX-License-Identifier: MPL-2.0
//! `paddock_player` is the media playback subsystem of the Paddock car
//! showcase app.
//!
//! It manages one playback session per opened player popup: loading the
//! underlying player resource, reconciling its asynchronous status events,
//! sampling playback progress, handling scrub gestures, and auto-hiding
//! the on-screen controls after a period of inactivity. Presentation is
//! out of scope; the host observes cloneable session snapshots and feeds
//! gestures back in.

#![doc(html_root_url = "https://docs.rs/paddock_player/0.1.0")]

pub mod config;
pub mod error;
pub mod host;
pub mod session;
pub mod source;

#[cfg(test)]
pub mod test_utils;
