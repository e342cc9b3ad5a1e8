//! Error types for Reya order signing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration (no private key, bad address).
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    /// A field is missing, unparseable or out of range for its declared type.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The fields handed to the input encoder do not match the declared order type.
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
        }
    }

    pub(crate) fn signing(message: impl Into<String>) -> Self {
        Error::Signing {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
