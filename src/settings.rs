//! Individually persisted user settings.
//!
//! Each setting lives under its own storage key and is read and written on
//! its own; nothing here refers to journal entries.

use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::session::timestamp::IdleThreshold;
use crate::storage::{load_json, store_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

/// Reads the idle threshold, falling back to the default when it is unset
/// or outside the accepted range.
pub fn load_threshold(kv: &dyn KeyValueStore) -> AppResult<IdleThreshold> {
    let Some(minutes) = load_json::<f64>(kv, constants::KEY_TIMESTAMP_THRESHOLD)? else {
        return Ok(IdleThreshold::default());
    };
    match IdleThreshold::from_minutes(minutes) {
        Ok(threshold) => Ok(threshold),
        Err(e) => {
            warn!("Ignoring stored idle threshold: {}", e);
            Ok(IdleThreshold::default())
        }
    }
}

pub fn save_threshold(kv: &mut dyn KeyValueStore, threshold: IdleThreshold) -> AppResult<()> {
    store_json(kv, constants::KEY_TIMESTAMP_THRESHOLD, &threshold.minutes())
}

/// Reads the cumulative keystroke counter.
pub fn load_keystrokes(kv: &dyn KeyValueStore) -> AppResult<u64> {
    Ok(load_json(kv, constants::KEY_TOTAL_KEYSTROKES)?.unwrap_or(0))
}

pub fn save_keystrokes(kv: &mut dyn KeyValueStore, total: u64) -> AppResult<()> {
    store_json(kv, constants::KEY_TOTAL_KEYSTROKES, &total)
}

/// Reads the lock password, or the default password if none was ever set.
pub fn load_password(kv: &dyn KeyValueStore) -> AppResult<Zeroizing<String>> {
    let stored: Option<String> = load_json(kv, constants::KEY_PASSWORD)?;
    Ok(Zeroizing::new(
        stored.unwrap_or_else(|| constants::DEFAULT_PASSWORD.to_string()),
    ))
}

pub fn save_password(kv: &mut dyn KeyValueStore, password: &str) -> AppResult<()> {
    store_json(kv, constants::KEY_PASSWORD, password)
}

/// A hue/saturation/lightness triple. Hue is in degrees, the others in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue: hue.clamp(0.0, 360.0),
            saturation: saturation.clamp(0.0, 100.0),
            lightness: lightness.clamp(0.0, 100.0),
        }
    }

    /// CSS color string, with the lightness shifted by `lightness_offset`
    /// and clamped to 0..=100.
    pub fn css(&self, lightness_offset: f64) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue.round(),
            self.saturation.round(),
            (self.lightness + lightness_offset).clamp(0.0, 100.0).round()
        )
    }
}

/// A saved foreground/background pair, in its persisted shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemePreset {
    pub hue: f64,
    pub sat: f64,
    pub light: f64,
    #[serde(rename = "bgHue")]
    pub bg_hue: f64,
    #[serde(rename = "bgSat")]
    pub bg_sat: f64,
    #[serde(rename = "bgLight")]
    pub bg_light: f64,
}

impl ThemePreset {
    const fn new(hue: f64, sat: f64, light: f64, bg_hue: f64, bg_sat: f64, bg_light: f64) -> Self {
        Self {
            hue,
            sat,
            light,
            bg_hue,
            bg_sat,
            bg_light,
        }
    }
}

pub const DEFAULT_PRESETS: [ThemePreset; constants::THEME_PRESET_COUNT] = [
    ThemePreset::new(174.0, 72.0, 56.0, 0.0, 0.0, 0.0),
    ThemePreset::new(220.0, 70.0, 60.0, 220.0, 15.0, 8.0),
    ThemePreset::new(35.0, 60.0, 65.0, 30.0, 30.0, 12.0),
    ThemePreset::new(340.0, 65.0, 58.0, 340.0, 20.0, 6.0),
];

/// Foreground and background colors plus the saved presets.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub foreground: Hsl,
    pub background: Hsl,
    pub presets: Vec<ThemePreset>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(&DEFAULT_PRESETS[0], DEFAULT_PRESETS.to_vec())
    }
}

impl Theme {
    fn from_preset(preset: &ThemePreset, presets: Vec<ThemePreset>) -> Self {
        Self {
            foreground: Hsl::new(preset.hue, preset.sat, preset.light),
            background: Hsl::new(preset.bg_hue, preset.bg_sat, preset.bg_light),
            presets,
        }
    }

    /// Loads the six color scalars and the preset list, each falling back to
    /// its default independently. Preset lists longer than four are cut down.
    pub fn load(kv: &dyn KeyValueStore) -> AppResult<Self> {
        let defaults = Self::default();
        let scalar = |key: &str, fallback: f64| -> AppResult<f64> {
            Ok(load_json(kv, key)?.unwrap_or(fallback))
        };

        let mut presets: Vec<ThemePreset> = load_json(kv, constants::KEY_COLOR_PRESETS)?
            .unwrap_or_else(|| DEFAULT_PRESETS.to_vec());
        presets.truncate(constants::THEME_PRESET_COUNT);

        Ok(Self {
            foreground: Hsl::new(
                scalar(constants::KEY_COLOR_HUE, defaults.foreground.hue)?,
                scalar(constants::KEY_COLOR_SATURATION, defaults.foreground.saturation)?,
                scalar(constants::KEY_COLOR_LIGHTNESS, defaults.foreground.lightness)?,
            ),
            background: Hsl::new(
                scalar(constants::KEY_BG_HUE, defaults.background.hue)?,
                scalar(constants::KEY_BG_SATURATION, defaults.background.saturation)?,
                scalar(constants::KEY_BG_LIGHTNESS, defaults.background.lightness)?,
            ),
            presets,
        })
    }

    pub fn save(&self, kv: &mut dyn KeyValueStore) -> AppResult<()> {
        store_json(kv, constants::KEY_COLOR_HUE, &self.foreground.hue)?;
        store_json(kv, constants::KEY_COLOR_SATURATION, &self.foreground.saturation)?;
        store_json(kv, constants::KEY_COLOR_LIGHTNESS, &self.foreground.lightness)?;
        store_json(kv, constants::KEY_BG_HUE, &self.background.hue)?;
        store_json(kv, constants::KEY_BG_SATURATION, &self.background.saturation)?;
        store_json(kv, constants::KEY_BG_LIGHTNESS, &self.background.lightness)?;
        store_json(kv, constants::KEY_COLOR_PRESETS, &self.presets)
    }

    pub fn current_preset(&self) -> ThemePreset {
        ThemePreset::new(
            self.foreground.hue,
            self.foreground.saturation,
            self.foreground.lightness,
            self.background.hue,
            self.background.saturation,
            self.background.lightness,
        )
    }

    /// Switches the colors to preset `index` (zero-based).
    pub fn apply_preset(&mut self, index: usize) -> AppResult<()> {
        let preset = *self.preset(index)?;
        self.foreground = Hsl::new(preset.hue, preset.sat, preset.light);
        self.background = Hsl::new(preset.bg_hue, preset.bg_sat, preset.bg_light);
        Ok(())
    }

    /// Overwrites preset `index` (zero-based) with the current colors.
    pub fn store_preset(&mut self, index: usize) -> AppResult<()> {
        let current = self.current_preset();
        self.preset(index)?;
        self.presets[index] = current;
        Ok(())
    }

    fn preset(&self, index: usize) -> AppResult<&ThemePreset> {
        self.presets.get(index).ok_or_else(|| {
            AppError::Journal(format!(
                "No theme preset {} (there are {})",
                index + 1,
                self.presets.len()
            ))
        })
    }
}
