// SPDX-License-Identifier: MPL-2.0
//! This module handles persisted playback preferences, loading and saving
//! them to a `player.toml` file in the platform configuration directory.
//!
//! The premium subscription flag lives here because the host supplies it
//! to each session at construction; the controller itself never re-reads
//! entitlement mid-session.
//!
//! # Examples
//!
//! ```no_run
//! use paddock_player::config::{self, Preferences};
//!
//! // Load existing preferences (missing file yields defaults)
//! let mut prefs = config::load().unwrap_or_default();
//!
//! // Flip a setting and save it back
//! prefs.premium = true;
//! config::save(&prefs).expect("failed to save preferences");
//! ```

mod defaults;

pub use defaults::{
    DEFAULT_AUTO_HIDE_DELAY_MS, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_VOLUME,
    MAX_AUTO_HIDE_DELAY_MS, MAX_SAMPLE_INTERVAL_MS, MAX_VOLUME, MIN_AUTO_HIDE_DELAY_MS,
    MIN_SAMPLE_INTERVAL_MS, MIN_VOLUME, VOLUME_STEP,
};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "player.toml";
const APP_NAME: &str = "Paddock";

/// Persisted playback preferences.
///
/// All fields are optional on disk so that older preference files keep
/// loading after new settings are introduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether the viewer holds a premium subscription.
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default)]
    pub muted: Option<bool>,
    #[serde(default)]
    pub autoplay: Option<bool>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            premium: false,
            volume: Some(DEFAULT_VOLUME),
            muted: Some(false),
            autoplay: Some(true),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Preferences> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Preferences::default())
}

pub fn save(prefs: &Preferences) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(prefs, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Preferences> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(prefs: &Preferences, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(prefs)?;
    fs::write(path, content)?;
    Ok(())
}
