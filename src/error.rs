//! Error types for the PDF utilities library

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF utilities library
///
/// Failures keep a three-way distinction: bytes that are not a PDF
/// ([`Error::Unreadable`]), an encrypted document no credential opens
/// ([`Error::Unauthorized`]), and caller mistakes
/// ([`Error::InvalidArgument`]).
#[derive(Error, Debug)]
pub enum Error {
    /// Source bytes could not be opened as a PDF document
    #[error("Not a readable PDF document: {0}")]
    Unreadable(lopdf::Error),

    /// No supplied credential unlocks an encrypted document
    #[error("Document is encrypted and no supplied credential unlocks it")]
    Unauthorized,

    /// Structurally invalid argument (non-positive scale factor, empty image list)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// PDF processing error on an already-opened document
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failure while building output encryption state
    #[error("Encryption error: {0}")]
    Encryption(String),
}
