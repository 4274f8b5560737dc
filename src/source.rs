// SPDX-License-Identifier: MPL-2.0
//! Content source selection for a playback session.
//!
//! A popup either plays real media from a locator or mounts substituted
//! content (an ad reel for non-entitled viewers, a placeholder when no
//! media is available). The choice is made once, by the host, before the
//! session is constructed; the controller never branches on entitlement
//! afterwards.

use crate::error::LoadError;
use url::Url;

/// What a playback session mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Real media, addressed by a locator.
    Media(MediaLocator),

    /// Substituted content mounted in place of the media.
    Substitute(SubstituteKind),
}

impl ContentSource {
    /// Returns true if this source plays real media.
    #[must_use]
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media(_))
    }

    /// Returns true if this source mounts substituted content.
    #[must_use]
    pub fn is_substitute(&self) -> bool {
        matches!(self, Self::Substitute(_))
    }
}

/// A raw media locator, validated when the player resource loads it.
///
/// The locator is kept as entered so that validation failures surface
/// through the load path as [`LoadError::InvalidSource`] instead of
/// panicking at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocator(String);

impl MediaLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the locator as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates the locator and resolves it to a URL.
    ///
    /// Player backends call this during `load`; a malformed locator is
    /// reported as [`LoadError::InvalidSource`], never a panic.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidSource`] if the locator is empty or
    /// does not parse as an absolute URL.
    pub fn resolve(&self) -> Result<Url, LoadError> {
        if self.0.trim().is_empty() {
            return Err(LoadError::InvalidSource);
        }
        Url::parse(&self.0).map_err(|_| LoadError::InvalidSource)
    }
}

impl std::fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of substituted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteKind {
    /// Bundled advertisement reel shown to non-entitled viewers.
    Ad,

    /// Static placeholder shown when no content is available.
    Placeholder,
}
