//! Resolved configuration and the on-disk override shape.

use crate::constants::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Rarity label → selection weight.
pub type RarityWeights = BTreeMap<String, f64>;

/// The two directory roots handed over by the process bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    /// Read-only bundled assets
    pub assets: PathBuf,
    /// Writable user data
    pub data: PathBuf,
}

impl Roots {
    pub fn new(assets: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        Self {
            assets: assets.into(),
            data: data.into(),
        }
    }

    /// Development layout: assets and data share one directory.
    pub fn shared(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            assets: root.clone(),
            data: root,
        }
    }
}

/// Fully resolved configuration. Every path is absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Seconds between encounters (> 0)
    pub encounter_delay: f64,
    pub rarity_weights: RarityWeights,
    /// 1-in-N chance of a rare encounter (>= 1)
    pub shiny_rate: u32,
    pub mute_audio: bool,
    pub shiny_count_file: PathBuf,
    pub shiny_log_file: PathBuf,
    pub error_log_file: PathBuf,
    /// Source name → catalog file. Iterated in name order when merging.
    pub catalog_files: BTreeMap<String, PathBuf>,
    /// Source name → expected fingerprint, layered over the pinned table
    pub catalog_fingerprints: BTreeMap<String, String>,
}

impl Default for Config {
    /// Built-in defaults with paths still relative to a root.
    fn default() -> Self {
        Self {
            encounter_delay: DEFAULT_ENCOUNTER_DELAY_SECONDS,
            rarity_weights: DEFAULT_RARITY_WEIGHTS
                .iter()
                .map(|(label, weight)| (label.to_string(), *weight))
                .collect(),
            shiny_rate: DEFAULT_SHINY_RATE,
            mute_audio: false,
            shiny_count_file: PathBuf::from(DEFAULT_SHINY_COUNT_FILE),
            shiny_log_file: PathBuf::from(DEFAULT_SHINY_LOG_FILE),
            error_log_file: PathBuf::from(DEFAULT_ERROR_LOG_FILE),
            catalog_files: DEFAULT_CATALOG_FILES
                .iter()
                .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
                .collect(),
            catalog_fingerprints: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn encounter_interval(&self) -> Duration {
        Duration::from_secs_f64(self.encounter_delay)
    }

    /// Weight for a rarity label; unknown labels weigh nothing.
    pub fn weight_for(&self, rarity: &str) -> f64 {
        self.rarity_weights.get(rarity).copied().unwrap_or(0.0)
    }
}

/// Optional user overrides read from `config.json`.
///
/// Values stay raw JSON here so one badly typed key cannot reject the whole
/// file; the resolver converts and validates each key on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverride {
    pub encounter_delay: Option<Value>,
    pub rarity_weights: Option<Value>,
    pub shiny_rate: Option<Value>,
    pub mute_audio: Option<Value>,
    pub shiny_count_file: Option<Value>,
    #[serde(alias = "shinies_encounter_file")]
    pub shiny_log_file: Option<Value>,
    pub error_log_file: Option<Value>,
    #[serde(alias = "pokemon_data_files")]
    pub catalog_files: Option<Value>,
    pub catalog_fingerprints: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.encounter_delay, 2.5);
        assert_eq!(config.shiny_rate, 2000);
        assert!(!config.mute_audio);
        assert_eq!(config.rarity_weights.len(), 5);
        assert_eq!(config.weight_for("Very Common"), 45.0);
        assert_eq!(config.catalog_files.len(), 2);
    }

    #[test]
    fn test_weight_for_unknown_label_is_zero() {
        let config = Config::default();
        assert_eq!(config.weight_for("Mythical"), 0.0);
    }

    #[test]
    fn test_override_accepts_legacy_key_names() {
        let json = r#"{
            "shiny_rate": 4096,
            "pokemon_data_files": {"gen1": "data/a.txt"},
            "shinies_encounter_file": "logs/found.txt",
            "some_unknown_key": true
        }"#;
        let parsed: ConfigOverride = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.shiny_rate, Some(Value::from(4096)));
        assert_eq!(parsed.shiny_log_file, Some(Value::from("logs/found.txt")));
        assert_eq!(parsed.catalog_files.unwrap()["gen1"], "data/a.txt");
        assert!(parsed.encounter_delay.is_none());
    }

    #[test]
    fn test_override_keeps_badly_typed_values_raw() {
        let json = r#"{"encounter_delay": 0.5, "shiny_rate": -1, "mute_audio": "yes"}"#;
        let parsed: ConfigOverride = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.encounter_delay, Some(Value::from(0.5)));
        assert_eq!(parsed.shiny_rate, Some(Value::from(-1)));
        assert_eq!(parsed.mute_audio, Some(Value::from("yes")));
    }

    #[test]
    fn test_encounter_interval_conversion() {
        let config = Config {
            encounter_delay: 0.25,
            ..Config::default()
        };
        assert_eq!(config.encounter_interval(), Duration::from_millis(250));
    }
}
