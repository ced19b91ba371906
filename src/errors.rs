// ABOUTME: Error types for the big-deck application
// ABOUTME: Provides structured error handling for parsing, generation and serving

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("No slides found in input")]
    NoSlidesError,

    #[error("Parser already used for another document")]
    ParserReused,

    #[error("Invalid theme '{0}'. Valid themes: dark, light, white")]
    InvalidTheme(String),

    #[error("Invalid aspect ratio '{0}'. Use a positive number, 'false' or 'none'")]
    InvalidAspectRatio(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serve error: {0}")]
    ServeError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
