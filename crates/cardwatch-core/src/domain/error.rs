//! Domain-level error taxonomy for Cardwatch.
//!
//! Missing or ambiguous card metadata is reported as a violation, never as an
//! error. The variants here cover malformed library inputs only.

use super::card::CardId;

/// Errors produced while validating a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate card id: {0}")]
    DuplicateCard(CardId),

    #[error("labels reference unknown card: {0}")]
    DanglingLabels(CardId),

    #[error("comments reference unknown card: {0}")]
    DanglingComments(CardId),
}

/// Cardwatch domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CardwatchError {
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config already installed")]
    ConfigAlreadyInstalled,

    #[error("unknown violation kind at position {0}")]
    UnknownViolationKind(usize),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Cardwatch domain operations.
pub type Result<T> = std::result::Result<T, CardwatchError>;
