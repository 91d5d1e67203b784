//! Engine configuration.
//!
//! Every section falls back to its defaults, so a config file only needs the
//! keys it changes:
//!
//! ```toml
//! [reconcile]
//! match_threshold = 0.8
//!
//! [scoring.characterizability]
//! distance = 0.3
//!
//! [sequence]
//! exact_limit = 12
//! time_limit_ms = 500
//! ```
//!
//! A `[[catalog.fields]]` table replaces the built-in field catalog entirely.

use std::path::Path;

use hwo_rank::RankingConfig;
use hwo_reconcile::{FieldCatalog, ReconcileConfig};
use hwo_score::ScoringConfig;
use hwo_sequence::SequenceConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub reconcile: ReconcileConfig,
    pub catalog: FieldCatalog,
    pub scoring: ScoringConfig,
    pub sequence: SequenceConfig,
    pub ranking: RankingConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_reconcile(&self.reconcile)?;
        self.catalog.validate()?;
        self.scoring.validate()?;
        self.sequence.validate()?;
        self.ranking.validate()?;
        Ok(())
    }
}

fn validate_reconcile(config: &ReconcileConfig) -> Result<(), ConfigError> {
    for (setting, value) in [
        ("header_weight", config.header_weight),
        ("value_weight", config.value_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidSetting {
                setting,
                message: format!("must be finite and non-negative, got {value}"),
            });
        }
    }
    if config.header_weight + config.value_weight <= 0.0 {
        return Err(ConfigError::InvalidSetting {
            setting: "header_weight",
            message: "header and value weights must not both be zero".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&config.match_threshold) {
        return Err(ConfigError::InvalidSetting {
            setting: "match_threshold",
            message: format!("must be within [0, 1], got {}", config.match_threshold),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_sections_override_only_named_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            [reconcile]
            match_threshold = 0.8

            [scoring.characterizability]
            distance = 0.3

            [sequence]
            exact_limit = 12
            time_limit_ms = 500

            [ranking.tier_points]
            high = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.reconcile.match_threshold, 0.8);
        assert_eq!(config.reconcile.header_weight, 0.7);
        assert_eq!(config.scoring.characterizability.distance, 0.3);
        assert_eq!(config.scoring.characterizability.stellar_type, 0.20);
        assert_eq!(config.sequence.exact_limit, 12);
        assert_eq!(config.sequence.time_limit_ms, Some(500));
        assert_eq!(config.ranking.tier_points.high, 30.0);
        assert_eq!(config.ranking.tier_points.low, 5.0);
        assert_eq!(config.catalog, FieldCatalog::default());
    }

    #[test]
    fn invalid_sections_are_reported() {
        let err = EngineConfig::from_toml_str("[reconcile]\nmatch_threshold = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                setting: "match_threshold",
                ..
            }
        ));

        let err = EngineConfig::from_toml_str("[sequence]\nexact_limit = 30").unwrap_err();
        assert!(matches!(err, ConfigError::Sequence(_)));

        let err = EngineConfig::from_toml_str("[ranking.weights]\ntier = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Ranking(_)));

        let err =
            EngineConfig::from_toml_str("[scoring.habitability]\nsize = -0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Scoring(_)));

        let err = EngineConfig::from_toml_str("[reconcile\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = EngineConfig::default().to_toml_string().unwrap();
        assert_eq!(
            EngineConfig::from_toml_str(&text).unwrap(),
            EngineConfig::default()
        );
    }
}
