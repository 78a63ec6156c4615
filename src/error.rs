//! Error types for streamsub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamsubError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture errors
    #[error("Capture tool not found: {tool}")]
    CaptureToolMissing { tool: String },

    #[error("Failed to start capture process: {message}")]
    CaptureSpawn { message: String },

    // Recognition errors
    #[error("Recognition engine not ready: {message}")]
    EngineNotReady { message: String },

    #[error("Recognition failed: {message}")]
    Recognition { message: String },

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, StreamsubError>;
