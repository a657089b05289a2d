//! Speed selector, variant flags and preferences
//!
//! The playable variants that used to be separate builds (cheat codes,
//! speed progression, trail length) are unified here as configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TRAIL_LENGTH;

/// Ball speed selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedLevel {
    #[default]
    Slow,
    Medium,
    Fast,
}

impl SpeedLevel {
    /// Velocity magnitude in units per tick
    pub fn base_speed(&self) -> f32 {
        match self {
            SpeedLevel::Slow => 1.0,
            SpeedLevel::Medium => 2.0,
            SpeedLevel::Fast => 3.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedLevel::Slow => "slow",
            SpeedLevel::Medium => "medium",
            SpeedLevel::Fast => "fast",
        }
    }

    /// Numeric selector value (1-3)
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SpeedLevel::Slow),
            2 => Some(SpeedLevel::Medium),
            3 => Some(SpeedLevel::Fast),
            _ => None,
        }
    }

    /// Parse selector input. Malformed values fall back to the baseline
    /// rather than propagating a parse failure.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "1" | "slow" => SpeedLevel::Slow,
            "2" | "medium" | "med" => SpeedLevel::Medium,
            "3" | "fast" => SpeedLevel::Fast,
            other => {
                log::warn!("unknown speed selector {other:?}, using the default");
                SpeedLevel::default()
            }
        }
    }

    /// The next faster level, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            SpeedLevel::Slow => Some(SpeedLevel::Medium),
            SpeedLevel::Medium => Some(SpeedLevel::Fast),
            SpeedLevel::Fast => None,
        }
    }
}

/// Debug cheat availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CheatMode {
    #[default]
    Disabled,
    Enabled,
}

/// What happens to the speed selection after a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProgressionPolicy {
    /// Keep the chosen speed
    #[default]
    Stay,
    /// Bump the next session one level faster, capped at Fast
    RaiseSpeed,
}

impl ProgressionPolicy {
    /// Speed for the next session after a win, if it should change
    pub fn next_speed(&self, current: SpeedLevel) -> Option<SpeedLevel> {
        match self {
            ProgressionPolicy::Stay => None,
            ProgressionPolicy::RaiseSpeed => current.next(),
        }
    }
}

/// Core gameplay configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameConfig {
    pub speed: SpeedLevel,
    pub cheats: CheatMode,
    pub progression: ProgressionPolicy,
    /// Ball trail capacity; 0 disables the trail
    pub trail_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: SpeedLevel::default(),
            cheats: CheatMode::default(),
            progression: ProgressionPolicy::default(),
            trail_length: TRAIL_LENGTH,
        }
    }
}

/// Player preferences, persisted as a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub speed: SpeedLevel,
    /// Ball trail on/off
    pub trails: bool,
    pub progression: ProgressionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedLevel::default(),
            trails: true,
            progression: ProgressionPolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on a missing or corrupt file
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Persist settings; failures are logged, never fatal
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("could not save settings: {err}");
                } else {
                    log::info!("settings saved");
                }
            }
            Err(err) => log::warn!("could not encode settings: {err}"),
        }
    }

    /// Gameplay configuration implied by these preferences
    pub fn config(&self) -> GameConfig {
        GameConfig {
            speed: self.speed,
            progression: self.progression,
            trail_length: if self.trails { TRAIL_LENGTH } else { 0 },
            ..GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_map() {
        assert_eq!(SpeedLevel::Slow.base_speed(), 1.0);
        assert_eq!(SpeedLevel::Medium.base_speed(), 2.0);
        assert_eq!(SpeedLevel::Fast.base_speed(), 3.0);
    }

    #[test]
    fn test_parse_accepts_numbers_and_names() {
        assert_eq!(SpeedLevel::parse("2"), SpeedLevel::Medium);
        assert_eq!(SpeedLevel::parse(" Fast "), SpeedLevel::Fast);
        assert_eq!(SpeedLevel::parse("slow"), SpeedLevel::Slow);
    }

    #[test]
    fn test_parse_malformed_falls_back() {
        assert_eq!(SpeedLevel::parse("warp 9"), SpeedLevel::default());
        assert_eq!(SpeedLevel::parse(""), SpeedLevel::default());
        assert_eq!(SpeedLevel::from_level(7), None);
    }

    #[test]
    fn test_progression_caps_at_fast() {
        let p = ProgressionPolicy::RaiseSpeed;
        assert_eq!(p.next_speed(SpeedLevel::Slow), Some(SpeedLevel::Medium));
        assert_eq!(p.next_speed(SpeedLevel::Fast), None);
        assert_eq!(ProgressionPolicy::Stay.next_speed(SpeedLevel::Slow), None);
    }

    #[test]
    fn test_settings_config_disables_trail() {
        let mut s = Settings::default();
        s.trails = false;
        assert_eq!(s.config().trail_length, 0);
        s.trails = true;
        assert_eq!(s.config().trail_length, TRAIL_LENGTH);
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let s = Settings {
            speed: SpeedLevel::Fast,
            trails: false,
            progression: ProgressionPolicy::RaiseSpeed,
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.speed, SpeedLevel::Fast);
        assert!(!back.trails);
        assert_eq!(back.progression, ProgressionPolicy::RaiseSpeed);
    }
}
