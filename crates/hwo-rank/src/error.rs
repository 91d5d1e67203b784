#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingConfigError {
    #[error("ranking weight '{name}' must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("ranking weights for characterizability, confidence and tier must not all be zero")]
    ZeroWeights,
    #[error("tier points for {tier} must be within [0, 100], got {value}")]
    InvalidTierPoints { tier: &'static str, value: f64 },
}
