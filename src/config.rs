//! Tuning knobs for monster generation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration parameters for the forge pipeline.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Probability that a random draw also gets a secondary type (default: 0.65).
    pub secondary_chance: f64,

    /// Exponent applied to mutagen rarity: `weight = 1 / rarity^alpha`.
    pub rarity_alpha: f64,

    /// Floor for rarity before inversion, keeps the weight finite.
    pub rarity_epsilon: f64,

    /// Ceiling for the product of a mutagen's synergy bonuses.
    pub synergy_cap: f64,

    /// Chance of a second physical trait (one trait otherwise).
    pub second_trait_chance: f64,

    /// Chance the monster is carrying an item.
    pub held_item_chance: f64,

    /// Name synthesis settings.
    pub naming: NameConfig,
}

/// Settings for the deterministic name synthesizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    /// Chance to attach an epithet (default: 0.25).
    pub epithet_chance: f64,

    /// Maximum characters in the base name, epithet excluded.
    pub max_chars: usize,

    /// Chance to build from type flavor pools instead of the syllable chain.
    pub flavored_chance: f64,

    /// Chance a flavored name also draws from the secondary type's pools.
    pub secondary_flavor_chance: f64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            secondary_chance: 0.65,
            rarity_alpha: 1.0,
            rarity_epsilon: 1e-6,
            synergy_cap: 8.0,
            second_trait_chance: 0.25,
            held_item_chance: 0.4,
            naming: NameConfig::default(),
        }
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            epithet_chance: 0.25,
            max_chars: 12,
            flavored_chance: 0.9,
            secondary_flavor_chance: 0.5,
        }
    }
}

impl ForgeConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ForgeConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that probabilities are in `[0, 1]` and the remaining knobs are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("secondary_chance", self.secondary_chance),
            ("second_trait_chance", self.second_trait_chance),
            ("held_item_chance", self.held_item_chance),
            ("naming.epithet_chance", self.naming.epithet_chance),
            ("naming.flavored_chance", self.naming.flavored_chance),
            ("naming.secondary_flavor_chance", self.naming.secondary_flavor_chance),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{p} is not a probability"),
                });
            }
        }

        let positives = [
            ("rarity_alpha", self.rarity_alpha),
            ("rarity_epsilon", self.rarity_epsilon),
            ("synergy_cap", self.synergy_cap),
        ];
        for (field, v) in positives {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{v} must be a positive number"),
                });
            }
        }

        if self.naming.max_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "naming.max_chars",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForgeConfig::default();
        assert_eq!(config.secondary_chance, 0.65);
        assert_eq!(config.rarity_alpha, 1.0);
        assert_eq!(config.synergy_cap, 8.0);
        assert_eq!(config.naming.max_chars, 12);
        assert_eq!(config.naming.epithet_chance, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.json");
        std::fs::write(&path, r#"{ "secondary_chance": 0.2, "naming": { "max_chars": 8 } }"#).unwrap();

        let config = ForgeConfig::load(&path).unwrap();
        assert_eq!(config.secondary_chance, 0.2);
        assert_eq!(config.naming.max_chars, 8);
        assert_eq!(config.naming.epithet_chance, 0.25);
        assert_eq!(config.held_item_chance, 0.4);
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let config = ForgeConfig {
            held_item_chance: 1.5,
            ..ForgeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "held_item_chance", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ForgeConfig::load(Path::new("/nonexistent/forge.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
