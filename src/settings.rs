//! Player preferences
//!
//! Persisted in LocalStorage on the web; native builds keep defaults.

use serde::{Deserialize, Serialize};

use crate::audio::AudioSink;

/// Audio and HUD preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Start matches muted
    pub muted: bool,
    /// Pause automatically when the tab is hidden
    pub pause_on_blur: bool,
    /// Seed for the next match; `None` picks one from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            pause_on_blur: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp values to their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    /// Push volume and mute preferences into an audio sink
    pub fn apply_to<A: AudioSink + ?Sized>(&self, audio: &mut A) {
        audio.set_volume(self.master_volume);
        audio.set_muted(self.muted || self.master_volume <= 0.0);
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "rps_arena_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings store on native ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
