//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur during software rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Raw pixel data does not match the declared dimensions.
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, len: usize },

    /// Invalid image dimensions (zero or negative width or height).
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// A color string could not be parsed.
    #[error("invalid color '{0}': expected RRGGBB or RRGGBBAA hex digits")]
    InvalidColor(String),

    /// Encoded image data could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
