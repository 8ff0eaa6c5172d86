//! Error types for santa-extract.

use std::io;
use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested file type is not one of the supported formats.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The byte buffer cannot be parsed as the claimed container format.
    #[error("Malformed {format} document: {reason}")]
    MalformedDocument {
        /// Container format that failed to parse ("pdf", "docx").
        format: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// Table detection failed on a single PDF page.
    #[error("Table detection error: {0}")]
    TableDetection(String),

    /// OCR failed or timed out on a single page.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// I/O error when reading files or spawning OCR tools.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed_pdf(reason: impl Into<String>) -> Self {
        Error::MalformedDocument {
            format: "pdf",
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_docx(reason: impl Into<String>) -> Self {
        Error::MalformedDocument {
            format: "docx",
            reason: reason.into(),
        }
    }

    /// Whether the error is caused by the caller's input rather than the
    /// runtime environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::MalformedDocument { .. }
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::Decryption(_) => Error::malformed_pdf("document is encrypted"),
            _ => Error::malformed_pdf(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::malformed_docx(err.to_string())
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::malformed_docx(format!("invalid XML: {}", err))
    }
}
