// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Config(String),
    Load(LoadError),
    Seek(SeekError),
}

/// Failure to allocate the underlying player resource for a content source.
///
/// Load failures are never fatal to the host: the controller degrades the
/// session to a visible failed state and the host decides whether to offer
/// a retry (by constructing a new session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The media locator is malformed or unsupported.
    InvalidSource,

    /// The underlying player resource failed to initialize.
    Backend(String),
}

/// Failure to reposition the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekError {
    /// Seek attempted before the media duration was resolved.
    ///
    /// This is a benign race between user input and asynchronous readiness;
    /// callers drop the seek rather than surfacing a fatal error.
    DurationUnknown,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidSource => write!(f, "invalid media source"),
            LoadError::Backend(msg) => write!(f, "player resource failed: {}", msg),
        }
    }
}

impl fmt::Display for SeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekError::DurationUnknown => write!(f, "seek before duration is known"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Load(e) => write!(f, "Load Error: {}", e),
            Error::Seek(e) => write!(f, "Seek Error: {}", e),
        }
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<SeekError> for Error {
    fn from(err: SeekError) -> Self {
        Error::Seek(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
