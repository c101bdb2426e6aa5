//! Player settings
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Bamboo size slider range (px)
pub const BASE_SIZE_RANGE: (u32, u32) = (30, 120);
/// Spawn rate slider range (ms between spawns)
pub const SPAWN_INTERVAL_RANGE: (u32, u32) = (500, 3000);

/// Player settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Nominal stalk width in pixels
    pub base_size: u32,
    /// Milliseconds between spawns
    pub spawn_interval_ms: u32,
    pub sound_enabled: bool,
    pub zen_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            base_size: 60,
            spawn_interval_ms: 1500,
            sound_enabled: true,
            zen_mode: false,
        }
    }
}

impl Settings {
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Set base size, clamped to the slider range
    pub fn set_base_size(&mut self, px: u32) {
        self.base_size = px.clamp(BASE_SIZE_RANGE.0, BASE_SIZE_RANGE.1);
    }

    /// Set spawn interval, clamped to the slider range
    pub fn set_spawn_interval(&mut self, ms: u32) {
        self.spawn_interval_ms = ms.clamp(SPAWN_INTERVAL_RANGE.0, SPAWN_INTERVAL_RANGE.1);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Zen mode on forces easy; turning it off keeps whatever is selected
    pub fn set_zen_mode(&mut self, zen: bool) {
        self.zen_mode = zen;
        if zen {
            self.difficulty = Difficulty::Easy;
        }
    }

    /// Re-apply range limits after deserializing hand-edited values
    pub fn sanitized(mut self) -> Self {
        self.set_base_size(self.base_size);
        self.set_spawn_interval(self.spawn_interval_ms);
        self
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bamboo_slice_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
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
                log::debug!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage under key {}", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
