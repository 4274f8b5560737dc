// SPDX-License-Identifier: MPL-2.0
//! Session host: the collaborator that opens and closes player popups.
//!
//! The host owns the entitlement decision. Content substitution happens
//! here, before a session is constructed, so the controller never
//! branches on entitlement: non-entitled viewers get the ad reel
//! mounted as the session's content source. At most one popup is live
//! at a time; opening a new one closes the previous session first.

use crate::config::{self, Preferences};
use crate::session::{self, PlayerBackend, SessionHandle, SessionOptions};
use crate::source::{ContentSource, MediaLocator, SubstituteKind};

/// Creates a player backend for each opened popup.
pub type BackendFactory = Box<dyn Fn() -> Box<dyn PlayerBackend> + Send>;

/// Host-side owner of the player popup.
///
/// Holds the persisted viewer preferences (including the premium
/// subscription flag) and at most one live [`SessionHandle`]. Dropping
/// the host drops every observer of the live session, which makes the
/// session pump release its resources on its own.
pub struct PopupHost {
    factory: BackendFactory,
    preferences: Preferences,
    active: Option<SessionHandle>,
}

impl PopupHost {
    /// Creates a host with preferences loaded from disk.
    #[must_use]
    pub fn new(factory: BackendFactory) -> Self {
        let preferences = config::load().unwrap_or_default();
        Self::with_preferences(factory, preferences)
    }

    /// Creates a host with explicit preferences; nothing is read from disk.
    #[must_use]
    pub fn with_preferences(factory: BackendFactory, preferences: Preferences) -> Self {
        Self {
            factory,
            preferences,
            active: None,
        }
    }

    /// Returns the current viewer preferences.
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Flips the premium subscription toggle.
    ///
    /// Affects the next opened popup; a live session keeps the
    /// entitlement it was constructed with.
    pub fn set_premium(&mut self, premium: bool) {
        self.preferences.premium = premium;
    }

    /// Opens the player popup for a media locator, replacing any live popup.
    ///
    /// The entitlement gate runs here: entitled viewers mount the media,
    /// everyone else mounts the substituted ad reel. The returned handle
    /// is a clone of the one the host keeps.
    pub fn open(&mut self, locator: &str) -> SessionHandle {
        self.close();

        let entitled = self.preferences.premium;
        let source = if entitled {
            ContentSource::Media(MediaLocator::new(locator))
        } else {
            ContentSource::Substitute(SubstituteKind::Ad)
        };
        let options = SessionOptions::new(source, entitled).with_preferences(&self.preferences);
        let handle = session::spawn((self.factory)(), options);
        self.active = Some(handle.clone());
        handle
    }

    /// Closes the live popup, if any, capturing its audio preferences.
    pub fn close(&mut self) {
        if let Some(handle) = self.active.take() {
            let snapshot = handle.snapshot();
            self.preferences.volume = Some(snapshot.volume.value());
            self.preferences.muted = Some(snapshot.muted);
            handle.close();
        }
    }

    /// Persists the current preferences to disk.
    ///
    /// # Errors
    ///
    /// Returns a config error if the preference file cannot be written.
    pub fn persist(&self) -> crate::error::Result<()> {
        config::save(&self.preferences)
    }

    /// Returns the live session handle, if a popup is open.
    #[must_use]
    pub fn active(&self) -> Option<&SessionHandle> {
        self.active.as_ref()
    }

    /// Returns true while an open popup's session is still running.
    #[must_use]
    pub fn has_active_popup(&self) -> bool {
        self.active.as_ref().is_some_and(SessionHandle::is_live)
    }
}

impl std::fmt::Debug for PopupHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupHost")
            .field("preferences", &self.preferences)
            .field("active", &self.active)
            .finish()
    }
}
