//! Game settings and preferences
//!
//! Shared between the menu and the level. Persisted as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Controller layout shown in the menu button prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControllerKind {
    None,
    #[default]
    Xbox,
    Sony,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::None => "None",
            ControllerKind::Xbox => "Xbox",
            ControllerKind::Sony => "Sony",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "keyboard" => Some(ControllerKind::None),
            "xbox" => Some(ControllerKind::Xbox),
            "sony" | "playstation" | "ps" => Some(ControllerKind::Sony),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ControllerKind::None => ControllerKind::Xbox,
            ControllerKind::Xbox => ControllerKind::Sony,
            ControllerKind::Sony => ControllerKind::None,
        }
    }
}

/// Lives per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LivesChoice {
    One,
    #[default]
    Five,
    NineNineNine,
}

impl LivesChoice {
    pub fn lives(&self) -> u32 {
        match self {
            LivesChoice::One => 1,
            LivesChoice::Five => 5,
            LivesChoice::NineNineNine => 999,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LivesChoice::One => "1",
            LivesChoice::Five => "5",
            LivesChoice::NineNineNine => "999",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(LivesChoice::One),
            "5" => Some(LivesChoice::Five),
            "999" => Some(LivesChoice::NineNineNine),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            LivesChoice::One => LivesChoice::Five,
            LivesChoice::Five => LivesChoice::NineNineNine,
            LivesChoice::NineNineNine => LivesChoice::One,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume in percent (0 - 100, steps of 10)
    pub master_volume: u8,
    pub controller: ControllerKind,
    pub lives: LivesChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 50,
            controller: ControllerKind::Xbox,
            lives: LivesChoice::Five,
        }
    }
}

impl Settings {
    const VOLUME_STEP: u8 = 10;
    const MAX_VOLUME: u8 = 100;

    pub fn volume_up(&mut self) {
        self.set_volume(self.master_volume.saturating_add(Self::VOLUME_STEP));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.master_volume.saturating_sub(Self::VOLUME_STEP));
    }

    /// Set the volume, snapped down to the step and clamped to 100
    pub fn set_volume(&mut self, percent: u8) {
        let clamped = percent.min(Self::MAX_VOLUME);
        self.master_volume = clamped - clamped % Self::VOLUME_STEP;
    }

    /// Volume as handed to the audio sink (0.0 - 1.0)
    pub fn volume_fraction(&self) -> f32 {
        f32::from(self.master_volume) / f32::from(Self::MAX_VOLUME)
    }

    pub fn cycle_controller(&mut self) {
        self.controller = self.controller.next();
    }

    pub fn cycle_lives(&mut self) {
        self.lives = self.lives.next();
    }

    /// Lives a new run starts with
    pub fn starting_lives(&self) -> u32 {
        self.lives.lives()
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&json)?;
        // Hand-edited files may hold off-step volumes
        settings.set_volume(settings.master_volume);
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crate_kicker_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.master_volume, 50);
        assert_eq!(settings.controller, ControllerKind::Xbox);
        assert_eq!(settings.starting_lives(), 5);
        assert_eq!(settings.volume_fraction(), 0.5);
    }

    #[test]
    fn test_volume_steps_and_clamps() {
        let mut settings = Settings::default();
        for _ in 0..8 {
            settings.volume_up();
        }
        assert_eq!(settings.master_volume, 100);
        for _ in 0..12 {
            settings.volume_down();
        }
        assert_eq!(settings.master_volume, 0);

        settings.set_volume(47);
        assert_eq!(settings.master_volume, 40);
        settings.set_volume(250);
        assert_eq!(settings.master_volume, 100);
    }

    #[test]
    fn test_lives_cycle() {
        let mut settings = Settings::default();
        settings.cycle_lives();
        assert_eq!(settings.starting_lives(), 999);
        settings.cycle_lives();
        assert_eq!(settings.starting_lives(), 1);
        settings.cycle_lives();
        assert_eq!(settings.lives, LivesChoice::Five);
    }

    #[test]
    fn test_controller_names() {
        assert_eq!(ControllerKind::from_str("PlayStation"), Some(ControllerKind::Sony));
        assert_eq!(ControllerKind::from_str("steam"), None);
        assert_eq!(ControllerKind::Sony.next(), ControllerKind::None);
        assert_eq!(LivesChoice::from_str("999"), Some(LivesChoice::NineNineNine));
        assert_eq!(LivesChoice::Five.as_str(), "5");
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_file("roundtrip");
        let mut settings = Settings::default();
        settings.set_volume(80);
        settings.cycle_controller();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = scratch_file("partial");
        std::fs::write(&path, r#"{ "master_volume": 73 }"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.master_volume, 70);
        assert_eq!(loaded.lives, LivesChoice::Five);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_bad_files_fall_back() {
        let missing = scratch_file("missing");
        assert!(matches!(Settings::load(&missing), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let garbage = scratch_file("garbage");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(Settings::load(&garbage), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_default(&garbage), Settings::default());
        let _ = std::fs::remove_file(&garbage);
    }
}
