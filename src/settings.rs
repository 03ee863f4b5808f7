//! Player preferences
//!
//! Persisted separately from session snapshots in LocalStorage. Stored JSON is
//! merged with defaults on load, so settings added later never break old saves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform;

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Clear colour behind the ring
    pub fn background(&self) -> [f32; 4] {
        match self {
            Theme::Light => [0.973, 0.976, 0.980, 1.0],
            Theme::Dark => [0.125, 0.129, 0.141, 1.0],
        }
    }

    /// Faint fill of the ring disc
    pub fn ring_fill(&self) -> [f32; 4] {
        match self {
            Theme::Light => [0.125, 0.129, 0.141, 0.05],
            Theme::Dark => [1.0, 1.0, 1.0, 0.05],
        }
    }

    /// Ring outline and pin shafts
    pub fn foreground(&self) -> [f32; 4] {
        match self {
            Theme::Light => [0.125, 0.129, 0.141, 1.0],
            Theme::Dark => [0.91, 0.918, 0.929, 1.0],
        }
    }
}

/// Colour of placed pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PinColor {
    /// Follows the theme's foreground
    #[default]
    Default,
    Red,
    Green,
    Blue,
    Gold,
}

impl PinColor {
    pub const ALL: [PinColor; 5] = [
        PinColor::Default,
        PinColor::Red,
        PinColor::Green,
        PinColor::Blue,
        PinColor::Gold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PinColor::Default => "default",
            PinColor::Red => "red",
            PinColor::Green => "green",
            PinColor::Blue => "blue",
            PinColor::Gold => "gold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s.to_lowercase())
    }

    /// RGBA for a placed pin under `theme`
    pub fn rgba(&self, theme: Theme) -> [f32; 4] {
        match self {
            PinColor::Default => theme.foreground(),
            PinColor::Red => [0.851, 0.188, 0.145, 1.0],
            PinColor::Green => [0.118, 0.557, 0.243, 1.0],
            PinColor::Blue => [0.102, 0.451, 0.910, 1.0],
            PinColor::Gold => [0.976, 0.671, 0.0, 1.0],
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Sound effects on/off
    pub sound: bool,
    /// Haptic feedback on/off
    pub vibration: bool,
    pub theme: Theme,
    pub pin_color: PinColor,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            theme: Theme::Light,
            pin_color: PinColor::Default,
            volume: 0.8,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "pin_ring_settings";

    /// Effective volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Parse stored JSON key by key over the defaults. Missing keys and keys
    /// whose value no longer parses keep their default; only input that is
    /// not a JSON object is rejected.
    pub fn from_json(json: &str) -> Option<Self> {
        let Ok(Value::Object(stored)) = serde_json::from_str::<Value>(json) else {
            return None;
        };
        let Ok(Value::Object(mut merged)) = serde_json::to_value(Self::default()) else {
            return None;
        };

        for (key, value) in stored {
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            if serde_json::from_value::<Settings>(Value::Object(candidate)).is_ok() {
                merged.insert(key, value);
            } else {
                log::warn!("Ignoring unreadable setting {key}");
            }
        }

        serde_json::from_value(Value::Object(merged)).ok()
    }

    /// Load settings from LocalStorage (defaults when absent or unreadable)
    pub fn load() -> Self {
        match platform::storage_get(Self::STORAGE_KEY).and_then(|json| Self::from_json(&json)) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        if platform::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_merges_with_defaults() {
        let settings = Settings::from_json(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.sound);
        assert!(settings.vibration);
        assert_eq!(settings.pin_color, PinColor::Default);
    }

    #[test]
    fn test_camel_case_keys() {
        let settings = Settings::from_json(r#"{"pinColor":"gold","sound":false}"#).unwrap();
        assert_eq!(settings.pin_color, PinColor::Gold);
        assert!(!settings.sound);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_unreadable_value_keeps_other_preferences() {
        let settings =
            Settings::from_json(r#"{"theme":"sepia","sound":false,"pinColor":"red","volume":"loud"}"#)
                .unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.sound);
        assert_eq!(settings.pin_color, PinColor::Red);
        assert_eq!(settings.volume, Settings::default().volume);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Settings::from_json("[1, 2]").is_none());
        assert!(Settings::from_json("not json").is_none());
    }

    #[test]
    fn test_default_pin_follows_theme() {
        assert_eq!(PinColor::Default.rgba(Theme::Dark), Theme::Dark.foreground());
        assert_ne!(PinColor::Red.rgba(Theme::Dark), Theme::Dark.foreground());
    }

    #[test]
    fn test_names_round_trip() {
        for color in PinColor::ALL {
            assert_eq!(PinColor::from_str(color.as_str()), Some(color));
        }
        assert_eq!(Theme::from_str("DARK"), Some(Theme::Dark));
    }
}
