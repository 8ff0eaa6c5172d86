//! Extraction result types returned to callers.

use serde::{Deserialize, Serialize};

/// Metadata describing how a document was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Normalized file type tag (lowercase, no leading dot)
    pub file_type: String,

    /// Number of pages, only for paginated formats
    pub page_count: Option<u32>,

    /// Length of the extracted text in characters
    pub char_count: usize,

    /// Strategy that produced the text (e.g., "lopdf+ocr(1/3)")
    pub extraction_method: String,

    /// Wall-clock extraction time in whole milliseconds
    pub extraction_time_ms: u64,

    /// Whether OCR contributed text to at least one page
    #[serde(default)]
    pub ocr_applied: bool,

    /// Number of tables converted to markdown
    #[serde(default)]
    pub table_count: usize,
}

/// Extracted text together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted text, blocks separated by blank lines
    pub text: String,

    /// Extraction metadata
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Wrap into a success response envelope.
    pub fn into_response(self) -> ExtractionResponse {
        ExtractionResponse {
            success: true,
            text: self.text,
            metadata: self.metadata,
        }
    }
}

/// Success envelope: `{ "success": true, "text": ..., "metadata": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Always true
    pub success: bool,
    /// Extracted text
    pub text: String,
    /// Extraction metadata
    pub metadata: ExtractionMetadata,
}

/// Failure envelope: `{ "success": false, "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a failure envelope from any displayable error.
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}
