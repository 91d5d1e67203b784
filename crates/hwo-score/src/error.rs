#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{group} weight '{name}' must be finite and non-negative, got {value}")]
    InvalidWeight {
        group: &'static str,
        name: &'static str,
        value: f64,
    },
    #[error("{group} weights must not all be zero")]
    ZeroWeights { group: &'static str },
    #[error("invalid {curve} curve: {message}")]
    Curve {
        curve: &'static str,
        message: String,
    },
}
