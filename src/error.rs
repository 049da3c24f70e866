//! Error types for encoding and compositing dual QR codes

use thiserror::Error;

/// Result type alias for duoqr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a composite QR image
#[derive(Error, Debug)]
pub enum Error {
    /// One of the two input texts was empty
    #[error("Please enter both texts: the {which} input is empty")]
    EmptyInput { which: &'static str },

    /// The two module matrices have different edge lengths
    #[error("Cannot merge QR codes of different sizes: {left}x{left} and {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The QR encoder rejected the input
    #[error("Error generating QR code: {0}")]
    Encoding(#[from] ::qrcode::types::QrError),

    /// Invalid configuration or malformed matrix data
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to encode or write the raster image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem error while saving output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
