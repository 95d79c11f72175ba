//! Merging the override file over defaults and anchoring paths to the roots.

use super::types::{Config, ConfigOverride, RarityWeights, Roots};
use crate::utils::persistence::ensure_parent_dir;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Turns built-in defaults plus an optional override file into a [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    roots: Roots,
}

impl ConfigResolver {
    pub fn new(roots: Roots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// Resolve the configuration.
    ///
    /// A missing or unparsable override never fails; only directory creation
    /// can. Relative override paths are taken from the data root.
    pub fn resolve(&self, override_path: Option<&Path>) -> io::Result<Config> {
        let mut config = Config::default();

        if let Some(path) = override_path {
            let path = self.anchor(path);
            if let Some(overrides) = read_override(&path) {
                apply_override(&mut config, overrides);
            }
        }

        self.anchor_paths(&mut config);
        self.ensure_directories(&config)?;
        self.seed_bundled_catalogs(&config);

        Ok(config)
    }

    fn anchor(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.roots.data.join(path)
        }
    }

    fn anchor_paths(&self, config: &mut Config) {
        config.shiny_count_file = self.anchor(&config.shiny_count_file);
        config.shiny_log_file = self.anchor(&config.shiny_log_file);
        config.error_log_file = self.anchor(&config.error_log_file);
        for path in config.catalog_files.values_mut() {
            *path = self.anchor(path);
        }
    }

    fn ensure_directories(&self, config: &Config) -> io::Result<()> {
        fs::create_dir_all(&self.roots.data)?;
        ensure_parent_dir(&config.shiny_count_file)?;
        ensure_parent_dir(&config.shiny_log_file)?;
        ensure_parent_dir(&config.error_log_file)?;
        for path in config.catalog_files.values() {
            ensure_parent_dir(path)?;
        }
        Ok(())
    }

    /// Copy bundled catalogs into the data root when they are missing there.
    fn seed_bundled_catalogs(&self, config: &Config) {
        if self.roots.assets == self.roots.data {
            return;
        }
        for (source, target) in &config.catalog_files {
            let Ok(relative) = target.strip_prefix(&self.roots.data) else {
                continue;
            };
            if target.exists() {
                continue;
            }
            let bundled = self.roots.assets.join(relative);
            if !bundled.is_file() {
                continue;
            }
            match fs::copy(&bundled, target) {
                Ok(_) => info!(source = %source, path = %target.display(), "Seeded bundled catalog"),
                Err(e) => warn!(source = %source, error = %e, "Could not seed bundled catalog"),
            }
        }
    }
}

fn read_override(path: &Path) -> Option<ConfigOverride> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config override, using defaults");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error reading config file. Using default settings.");
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(overrides) => Some(overrides),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error loading config file. Using default settings.");
            None
        }
    }
}

/// Shallow merge: each valid key replaces the default, invalid keys are
/// reported and ignored without affecting the others.
fn apply_override(config: &mut Config, overrides: ConfigOverride) {
    if let Some(delay) = convert::<f64>("encounter_delay", overrides.encounter_delay) {
        if delay.is_finite() && delay > 0.0 {
            config.encounter_delay = delay;
        } else {
            warn!(value = delay, "encounter_delay must be a positive number; keeping default");
        }
    }

    if let Some(weights) = convert::<RarityWeights>("rarity_weights", overrides.rarity_weights) {
        if weights_are_valid(&weights) {
            config.rarity_weights = weights;
        } else {
            warn!("rarity_weights must be finite and non-negative; keeping default");
        }
    }

    if let Some(rate) = convert::<u32>("shiny_rate", overrides.shiny_rate) {
        if rate >= 1 {
            config.shiny_rate = rate;
        } else {
            warn!("shiny_rate must be at least 1; keeping default");
        }
    }

    if let Some(mute) = convert("mute_audio", overrides.mute_audio) {
        config.mute_audio = mute;
    }
    if let Some(path) = convert("shiny_count_file", overrides.shiny_count_file) {
        config.shiny_count_file = path;
    }
    if let Some(path) = convert("shiny_log_file", overrides.shiny_log_file) {
        config.shiny_log_file = path;
    }
    if let Some(path) = convert("error_log_file", overrides.error_log_file) {
        config.error_log_file = path;
    }
    if let Some(files) = convert("catalog_files", overrides.catalog_files) {
        config.catalog_files = files;
    }
    if let Some(fingerprints) = convert("catalog_fingerprints", overrides.catalog_fingerprints) {
        config.catalog_fingerprints = fingerprints;
    }
}

/// Typed value of one override key; a wrongly typed value is warned about
/// and treated as absent.
fn convert<T: DeserializeOwned>(key: &str, value: Option<Value>) -> Option<T> {
    match serde_json::from_value(value?) {
        Ok(typed) => Some(typed),
        Err(e) => {
            warn!(key, error = %e, "Invalid config value; keeping default");
            None
        }
    }
}

/// Every weight finite and non-negative, and the total finite.
fn weights_are_valid(weights: &RarityWeights) -> bool {
    weights.values().all(|w| w.is_finite() && *w >= 0.0)
        && weights.values().sum::<f64>().is_finite()
}
