//! Error types for mailcraft
//!
//! Every fatal condition carries the input that caused it (token text,
//! file path or domain string) so the message alone is actionable.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mailcraft
#[derive(Error, Debug)]
pub enum MailcraftError {
    #[error("Unknown token: [{0}]")]
    UnknownToken(String),

    #[error("Invalid parameter in token [{token}]: {reason}")]
    InvalidParameter { token: String, reason: String },

    #[error("Payload '{0}' contains no [...] tokens")]
    EmptyPayload(String),

    #[error("Payload uses [{token}] but no {flag} source was supplied")]
    MissingSource {
        token: &'static str,
        flag: &'static str,
    },

    #[error("Payload uses [{token}] but its source has no entries")]
    EmptySource { token: &'static str },

    #[error("Required input file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Input file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error("Invalid domain: '{0}'")]
    InvalidDomain(String),

    #[error("Use either --payload or --template, not both")]
    ConflictingPayloadSource,

    #[error("Either --payload or --template is required")]
    MissingPayloadSource,

    #[error("CSV delimiter must be a single ASCII character, got '{0}'")]
    InvalidCsvDelimiter(String),

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV export failed")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed")]
    Json(#[from] serde_json::Error),
}

impl MailcraftError {
    pub fn invalid_parameter(token: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for mailcraft operations
pub type Result<T> = std::result::Result<T, MailcraftError>;
