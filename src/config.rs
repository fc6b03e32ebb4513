//! User settings for the pet population.
//!
//! Read from a flat JSON object such as
//! `{"speaki.count": 2, "erpin.count": 1, "scale": 0.5, "soundEnabled": true}`.
//! Parsing never fails on bad values; each key falls back to its default.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::pet::Archetype;

const DEFAULT_SCALE: f32 = 0.5;
/// Most pets of one kind a page will host.
pub const MAX_COUNT: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Desired live count, indexed by `Archetype::index`.
    pub counts: [u32; 3],
    pub scale: f32,
    pub sound_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            counts: Archetype::ALL.map(Archetype::default_count),
            scale: DEFAULT_SCALE,
            sound_enabled: true,
        }
    }
}

impl Config {
    pub fn count(&self, archetype: Archetype) -> u32 {
        self.counts[archetype.index()]
    }

    pub fn set_count(&mut self, archetype: Archetype, count: u32) {
        self.counts[archetype.index()] = count;
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut config = Self::default();

        for archetype in Archetype::ALL {
            let key = format!("{}.count", archetype.label());
            if let Some(value) = map.get(&key) {
                config.set_count(archetype, parse_count(&key, value));
            }
        }

        if let Some(value) = map.get("scale") {
            match as_number(value) {
                Some(s) if s.is_finite() && s > 0.0 => config.scale = s as f32,
                _ => log::warn!("config: invalid scale {value}, using {DEFAULT_SCALE}"),
            }
        }

        if let Some(value) = map.get("soundEnabled") {
            match value {
                Value::Bool(b) => config.sound_enabled = *b,
                _ => log::warn!("config: soundEnabled must be a boolean, got {value}"),
            }
        }

        config
    }

    /// Anything that isn't an object yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => {
                log::warn!("config: expected an object, using defaults");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_value(&value))
    }
}

/// Numbers and numeric strings. Storage layers tend to stringify.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Floors fractions. Negative, non-finite and non-numeric become 0; anything
/// above `MAX_COUNT` is capped.
fn parse_count(key: &str, value: &Value) -> u32 {
    match as_number(value) {
        Some(n) if n.is_finite() && n > MAX_COUNT as f64 => {
            log::warn!("config: {key} of {value} is too many, capping at {MAX_COUNT}");
            MAX_COUNT
        }
        Some(n) if n.is_finite() && n > 0.0 => n.floor() as u32,
        Some(n) if n.is_finite() => 0,
        _ => {
            log::warn!("config: {key} is not a number ({value}), treating as 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(v: Value) -> Config {
        Config::from_value(&v)
    }

    #[test]
    fn defaults_for_missing_keys() {
        let c = parse(json!({}));
        assert_eq!(c, Config::default());
        assert_eq!(c.count(Archetype::Speaki), 1);
        assert_eq!(c.count(Archetype::Erpin), 1);
        assert_eq!(c.count(Archetype::Gengar), 0);
        assert_eq!(c.scale, 0.5);
        assert!(c.sound_enabled);
    }

    #[test]
    fn full_config() {
        let c = parse(json!({
            "speaki.count": 3,
            "erpin.count": 0,
            "gengar.count": 2,
            "scale": 0.8,
            "soundEnabled": false
        }));
        assert_eq!(c.counts, [3, 0, 2]);
        assert!((c.scale - 0.8).abs() < 1e-6);
        assert!(!c.sound_enabled);
    }

    #[test]
    fn lenient_counts() {
        let c = parse(json!({
            "speaki.count": -4,
            "erpin.count": 2.9,
            "gengar.count": "many"
        }));
        assert_eq!(c.counts, [0, 2, 0]);

        let c = parse(json!({ "speaki.count": "5", "erpin.count": null }));
        assert_eq!(c.counts, [5, 0, 0]);
    }

    #[test]
    fn huge_counts_are_capped() {
        let c = parse(json!({
            "speaki.count": 4e9,
            "erpin.count": "100.5",
            "gengar.count": 100
        }));
        assert_eq!(c.counts, [MAX_COUNT, MAX_COUNT, 100]);

        let c = parse(json!({ "speaki.count": 99.9 }));
        assert_eq!(c.count(Archetype::Speaki), 99);
    }

    #[test]
    fn bad_scale_and_sound_fall_back() {
        let c = parse(json!({ "scale": -1.0, "soundEnabled": "yes" }));
        assert_eq!(c.scale, 0.5);
        assert!(c.sound_enabled);

        let c = parse(json!({ "scale": "0.25" }));
        assert_eq!(c.scale, 0.25);
    }

    #[test]
    fn non_object_is_default() {
        assert_eq!(parse(json!([1, 2, 3])), Config::default());
    }
}
