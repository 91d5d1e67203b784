use std::path::PathBuf;

use hwo_rank::RankingConfigError;
use hwo_reconcile::CatalogError;
use hwo_score::ScoringConfigError;
use hwo_sequence::OptimizerInputError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid reconcile setting '{setting}': {message}")]
    InvalidSetting {
        setting: &'static str,
        message: String,
    },
    #[error("invalid field catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid scoring config: {0}")]
    Scoring(#[from] ScoringConfigError),
    #[error("invalid sequence config: {0}")]
    Sequence(#[from] OptimizerInputError),
    #[error("invalid ranking config: {0}")]
    Ranking(#[from] RankingConfigError),
}
