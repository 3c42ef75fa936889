//! Error types for PaperSage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
