//! Error types for the textscape demo
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow` at the
//! application boundary.

use std::path::PathBuf;

/// Result type for textscape operations
pub type Result<T> = std::result::Result<T, TextscapeError>;

/// Errors that can occur while loading assets or generating geometry
#[derive(Debug, thiserror::Error)]
pub enum TextscapeError {
    /// Failed to read an asset from disk
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The typeface description is not valid JSON or misses required fields
    #[error("Malformed typeface description: {0}")]
    TypefaceJson(#[from] serde_json::Error),

    /// A glyph outline command string could not be parsed
    #[error("Invalid outline for glyph '{glyph}': {reason}")]
    InvalidOutline { glyph: char, reason: String },

    /// A matcap image could not be decoded
    #[error("Failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Text generation was requested before the typeface finished loading
    #[error("Text generation requires a loaded typeface")]
    FontNotLoaded,

    /// The GPU adapter, device or surface could not be created
    #[error("GPU setup failed: {0}")]
    GpuSetup(String),
}
