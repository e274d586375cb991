//! @acp:module "Errors"
//! @acp:summary "Library error type and result alias"
//! @acp:domain scoring
//! @acp:layer types

use thiserror::Error;

/// @acp:summary "Errors raised by the achievement engine and its adapters"
#[derive(Debug, Error)]
pub enum AchieveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] ::notify::Error),

    #[error("Unknown field key: {0}")]
    UnknownField(String),

    #[error("Field {key} is read-only")]
    ReadOnlyField { key: String },

    #[error("{stage} stage failed: {message}")]
    Stage { stage: &'static str, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AchieveError {
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        AchieveError::Stage {
            stage,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AchieveError>;
