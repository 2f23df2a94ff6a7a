//! Error types for the flag engine
//!
//! Nothing in the engine is fatal: operations convert these errors into
//! warnings and keep going with whatever facts they still have.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format in {path}: {message}")]
    InvalidFormat { path: String, message: String },

    #[error("Unparseable literal '{literal}': {message}")]
    UnparseableLiteral { literal: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, FlagError>;

impl FlagError {
    pub fn unparseable(literal: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnparseableLiteral {
            literal: literal.into(),
            message: message.into(),
        }
    }

    pub fn invalid_format(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
