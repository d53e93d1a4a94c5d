//! Error types for meetdir.

use thiserror::Error;

/// Errors that can occur in meetdir operations.
#[derive(Error, Debug)]
pub enum MeetDirError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not fetch meetings: {0}")]
    Fetch(String),

    #[error("Could not read meeting data: {0}")]
    Parse(String),

    #[error("Meeting not found: {0}")]
    MeetingNotFound(String),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MeetDirError {
    fn from(err: serde_json::Error) -> Self {
        MeetDirError::Parse(err.to_string())
    }
}

/// Result type alias for meetdir operations.
pub type MeetDirResult<T> = Result<T, MeetDirError>;
