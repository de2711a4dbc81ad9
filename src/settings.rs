//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web and as a JSON file natively.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slowest selectable horizontal speed multiplier
pub const SPEED_MIN: f32 = 0.5;
/// Fastest selectable horizontal speed multiplier
pub const SPEED_MAX: f32 = 2.5;
/// Slider granularity
pub const SPEED_STEP: f32 = 0.1;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Scales horizontal speed only
    speed_multiplier: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
        }
    }
}

impl Settings {
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Set the multiplier, clamped to the slider range
    pub fn set_speed_multiplier(&mut self, value: f32) {
        self.speed_multiplier = if value.is_finite() {
            value.clamp(SPEED_MIN, SPEED_MAX)
        } else {
            1.0
        };
    }

    /// Slider label, e.g. "1.5x"
    pub fn speed_label(&self) -> String {
        format!("{:.1}x", self.speed_multiplier)
    }

    fn sanitized(mut self) -> Self {
        self.set_speed_multiplier(self.speed_multiplier);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pixel_platformer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
