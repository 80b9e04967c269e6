//! Error types for orbitcap.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for orbitcap operations.
#[derive(Error, Debug)]
pub enum OrbitcapError {
    /// Capture options failed validation.
    #[error("invalid capture options: {0}")]
    InvalidOptions(String),

    /// The scene file could not be loaded.
    #[error("failed to load scene '{path}': {reason}")]
    SceneLoadError { path: PathBuf, reason: String },

    /// The graphics context could not be created.
    #[error("graphics context error: {0}")]
    ContextError(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// Encoding or post-processing an output image failed.
    #[error("image error for '{path}': {reason}")]
    ImageError { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for orbitcap operations.
pub type Result<T> = std::result::Result<T, OrbitcapError>;
