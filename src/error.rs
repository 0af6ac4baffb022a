//! Error types for guessmap

use thiserror::Error;

/// Main error type for guessmap operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("No valid set of places found after {attempts} attempts")]
    LocationExhausted { attempts: u32 },

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("POI source error: {0}")]
    PoiSource(String),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Publishing error: {0}")]
    Publish(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for guessmap operations
pub type Result<T> = std::result::Result<T, Error>;
