// Error types shared across the service

use std::time::Duration;
use thiserror::Error;

/// Reasons a translation could not be delivered.
///
/// The display text is what callers see in the `error` field of a
/// failed result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Language {0} not found")]
    LanguageNotFound(String),

    #[error("No hash for {0}")]
    MissingHash(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("HTTP error {0}")]
    Status(u16),

    #[error("Invalid JSON response")]
    InvalidJson,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored data has version {found}, newest supported is {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Failures that prevent the service from starting
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to load stored metadata: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures answered with an error message on the command channel
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Error storing metadata: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommandError {
    /// Machine readable code sent alongside the message
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "invalid_format",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Storage(_) => "storage_error",
            Self::Encode(_) => "unknown_error",
        }
    }
}
