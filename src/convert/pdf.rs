//! PDF document converter implementation.

use crate::error::Result;
use crate::parser::extract_pdf;

use super::{ConvertResult, DocumentConverter, ExtractOptions};

/// PDF document converter.
///
/// Extracts the text layer page by page, with OCR for sparse pages when the
/// options carry an available OCR provider.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ConvertResult> {
        let extraction = extract_pdf(bytes, &options.pdf, options.ocr.as_ref())?;
        let method = extraction.method();
        let ocr_applied = extraction.ocr_applied();

        Ok(ConvertResult {
            text: extraction.text,
            page_count: Some(extraction.page_count),
            method,
            ocr_applied,
            table_count: extraction.table_count,
        })
    }
}
