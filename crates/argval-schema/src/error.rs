use std::path::PathBuf;

use argval::{MisconfigurationError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid spec document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Misconfiguration(#[from] MisconfigurationError),

    #[error("invalid default '{value}' for '{identifier}': {source}")]
    InvalidDefault {
        identifier: String,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid bound '{0}'")]
    InvalidBound(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
