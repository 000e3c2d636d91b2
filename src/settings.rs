//! Game settings and preferences
//!
//! Persisted separately from high scores in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::platform::KeyValueStore;

/// Music sits under the effects in the mix
const MUSIC_MIX: f32 = 0.5;
/// Master volume change per -/+ press
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off (toggled from the menu or with M)
    pub music_enabled: bool,
    /// Sound effects on/off
    pub sfx_enabled: bool,
    /// Master volume (0.0 - 1.0), stepped with -/+
    pub master_volume: f32,

    // === HUD ===
    /// Show FPS counter (F)
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no rising score markers) (R)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
            master_volume: 0.8,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "side_runner_settings";

    /// Flip music on/off, returning the new state
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_enabled = !self.sfx_enabled;
        self.sfx_enabled
    }

    pub fn toggle_show_fps(&mut self) -> bool {
        self.show_fps = !self.show_fps;
        self.show_fps
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    /// Nudge master volume, returning the clamped result
    pub fn adjust_master_volume(&mut self, delta: f32) -> f32 {
        // Round to whole steps so repeated presses land on 0.0 and 1.0 exactly
        let stepped = ((self.master_volume + delta) / VOLUME_STEP).round() * VOLUME_STEP;
        self.master_volume = stepped.clamp(0.0, 1.0);
        self.master_volume
    }

    /// Effective music gain (0 when disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            (self.master_volume * MUSIC_MIX).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective sound effect gain (0 when disabled)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let settings: Settings = persistence::load_or_default(store, Self::STORAGE_KEY);
        log::info!("Settings loaded (music {})", if settings.music_enabled { "on" } else { "off" });
        settings
    }

    /// Save settings
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        if persistence::save(store, Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_toggle_music() {
        let mut settings = Settings::default();
        assert!(settings.music_enabled);
        assert!(!settings.toggle_music());
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert!(settings.toggle_music());
        assert!((settings.effective_music_volume() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings {
            master_volume: 2.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 1.0);
    }

    #[test]
    fn test_master_volume_steps_and_clamps() {
        let mut settings = Settings::default();
        assert!((settings.adjust_master_volume(VOLUME_STEP) - 0.9).abs() < 1e-6);
        for _ in 0..5 {
            settings.adjust_master_volume(VOLUME_STEP);
        }
        assert_eq!(settings.master_volume, 1.0);
        for _ in 0..15 {
            settings.adjust_master_volume(-VOLUME_STEP);
        }
        assert_eq!(settings.master_volume, 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_sfx_toggle_silences_effects() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_sfx());
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        // Music is independent
        assert!(settings.effective_music_volume() > 0.0);
    }

    #[test]
    fn test_display_toggles_survive_reload() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        assert!(settings.toggle_show_fps());
        assert!(settings.toggle_reduced_motion());
        settings.adjust_master_volume(-VOLUME_STEP);
        settings.save(&mut store);

        let reloaded = Settings::load(&store);
        assert!(reloaded.show_fps);
        assert!(reloaded.reduced_motion);
        assert!((reloaded.master_volume - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_persisted_toggle_survives_reload() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        settings.toggle_music();
        settings.save(&mut store);

        assert!(!Settings::load(&store).music_enabled);
    }

    #[test]
    fn test_old_saves_fill_missing_fields() {
        let mut store = MemoryStore::new();
        store.set("side_runner_settings", r#"{"music_enabled": false}"#).unwrap();
        let settings = Settings::load(&store);
        assert!(!settings.music_enabled);
        assert!(settings.sfx_enabled);
    }
}
