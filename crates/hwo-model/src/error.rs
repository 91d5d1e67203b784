use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid target identifier: '{0}'")]
    InvalidTargetId(String),
    #[error("not a number: '{0}'")]
    NotNumeric(String),
    #[error("not an integer: '{0}'")]
    NotInteger(String),
    #[error("unknown {kind}: '{value}'")]
    UnknownCategory { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
