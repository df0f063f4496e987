//! Unified error types for WikiTok
//!
//! This module defines error types for each layer:
//! - `WikipediaError`: Wikipedia query API client errors
//! - `ImageError`: thumbnail loading errors
//! - `PlatformError`: share, clipboard and launcher errors
//! - `AppError`: Application layer errors (wraps the others)

use thiserror::Error;

/// Wikipedia query API client errors
#[derive(Debug, Error)]
pub enum WikipediaError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but carried an `error` object
    #[error("Wikipedia rejected the query: {code} - {info}")]
    Remote { code: String, info: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Thumbnail loading errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image request returned status {0}")]
    Status(u16),

    #[error("Not an image: {url} ({content_type})")]
    NotAnImage { url: String, content_type: String },
}

/// Platform capability errors (share, clipboard, launcher)
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("{program} failed: {message}")]
    Command { program: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application layer errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Wikipedia error: {0}")]
    Wikipedia(#[from] WikipediaError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
