//! Error handling for the prepscore engine
//!
//! Only three kinds of failure propagate to callers: unsupported or
//! undecodable documents, and bad configuration at a call boundary.
//! Everything else (low extraction quality, unknown resume format, empty
//! documents) is surfaced as warnings on the report itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepScoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ontology error: {0}")]
    Ontology(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrepScoreError>;
