//! # santa-extract
//!
//! Document text extraction for PDF, DOCX and plain text files.
//!
//! The output is LLM-friendly text: DOCX headings become `#` headings, list
//! paragraphs become `- ` items, and tables from both PDF and DOCX documents
//! are rendered as markdown pipe tables. Sparse PDF pages (scans) can fall
//! back to OCR through an injectable [`OcrEngine`].
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> santa_extract::Result<()> {
//!     let data = std::fs::read("report.pdf")?;
//!     let result = santa_extract::extract(&data, "pdf")?;
//!
//!     println!("{} chars via {}", result.metadata.char_count, result.metadata.extraction_method);
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## OCR
//!
//! ```no_run
//! use santa_extract::Extractor;
//!
//! let extractor = Extractor::new().with_system_ocr();
//! let data = std::fs::read("scan.pdf").unwrap();
//! let result = extractor.extract(&data, "pdf").unwrap();
//! assert_eq!(result.metadata.ocr_applied, result.metadata.extraction_method.contains("ocr"));
//! ```

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod render;

use std::sync::Arc;

// Re-export commonly used types
pub use convert::{ConvertResult, ConverterRegistry, DocumentConverter, ExtractOptions};
pub use detect::{is_supported_file_type, normalize_file_type, SUPPORTED_FILE_TYPES};
pub use error::{Error, Result};
pub use model::{
    Block, ErrorResponse, ExtractionMetadata, ExtractionResponse, ExtractionResult, Table,
};
pub use ocr::{NoOcr, OcrConfig, OcrEngine, TesseractOcr};
pub use parser::{ErrorMode, PdfOptions, OCR_DPI, SPARSE_TEXT_THRESHOLD};

/// Extract text from a document held in memory, with OCR disabled.
///
/// # Arguments
///
/// * `data` - Document content as bytes
/// * `file_type` - File type tag such as `"pdf"`, `".DOCX"` or `"md"`
///
/// # Example
///
/// ```
/// let result = santa_extract::extract(b"Hello, world", "txt").unwrap();
/// assert_eq!(result.text, "Hello, world");
/// assert_eq!(result.metadata.char_count, 12);
/// ```
pub fn extract(data: &[u8], file_type: &str) -> Result<ExtractionResult> {
    Extractor::new().extract(data, file_type)
}

/// Builder bundling a converter registry with extraction options.
///
/// An `Extractor` is immutable once built and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use santa_extract::{Extractor, PdfOptions};
///
/// let extractor = Extractor::new()
///     .with_system_ocr()
///     .with_pdf_options(PdfOptions::new().with_sparse_threshold(100));
/// let result = extractor.extract(&std::fs::read("scan.pdf")?, "pdf")?;
/// # Ok::<(), santa_extract::Error>(())
/// ```
pub struct Extractor {
    registry: ConverterRegistry,
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the default converters and OCR disabled.
    pub fn new() -> Self {
        Self {
            registry: ConverterRegistry::with_defaults(),
            options: ExtractOptions::default(),
        }
    }

    /// Use `pdftoppm` and `tesseract` from `PATH` for sparse pages.
    ///
    /// Missing tools are logged and leave OCR disabled.
    pub fn with_system_ocr(self) -> Self {
        self.with_ocr(Arc::new(TesseractOcr::detect()))
    }

    /// Use a custom OCR provider.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.options = self.options.with_ocr(ocr);
        self
    }

    /// Set PDF extraction options.
    pub fn with_pdf_options(mut self, options: PdfOptions) -> Self {
        self.options = self.options.with_pdf_options(options);
        self
    }

    /// Replace the converter registry.
    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Get the extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract text from `data`, dispatching on `file_type`.
    pub fn extract(&self, data: &[u8], file_type: &str) -> Result<ExtractionResult> {
        self.registry.extract(data, file_type, &self.options)
    }

    /// Extract on tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn extract_async(
        self: Arc<Self>,
        data: Vec<u8>,
        file_type: String,
    ) -> Result<ExtractionResult> {
        tokio::task::spawn_blocking(move || self.extract(&data, &file_type))
            .await
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract text on tokio's blocking pool, with OCR disabled.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> santa_extract::Result<()> {
/// let data = tokio::fs::read("report.docx").await?;
/// let result = santa_extract::extract_async(data, "docx").await?;
/// println!("{}", result.text);
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "async")]
pub async fn extract_async(data: Vec<u8>, file_type: impl Into<String>) -> Result<ExtractionResult> {
    Arc::new(Extractor::new())
        .extract_async(data, file_type.into())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_file() {
        let result = extract("Grüße".as_bytes(), "md").unwrap();
        assert_eq!(result.text, "Grüße");
        assert_eq!(result.metadata.char_count, 5);
        assert_eq!(result.metadata.file_type, "md");
        assert_eq!(result.metadata.extraction_method, "chardetng");
        assert!(!result.metadata.ocr_applied);
    }

    #[test]
    fn test_extract_unsupported() {
        let err = extract(b"a,b", "csv").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref tag) if tag == "csv"));
    }

    #[test]
    fn test_extract_empty_pdf_fails() {
        let result = extract(b"", "pdf");
        assert!(matches!(
            result,
            Err(Error::MalformedDocument { format: "pdf", .. })
        ));
    }

    #[test]
    fn test_extract_empty_docx_fails() {
        let result = extract(b"", "docx");
        assert!(matches!(
            result,
            Err(Error::MalformedDocument { format: "docx", .. })
        ));
    }

    #[test]
    fn test_extract_empty_text() {
        let result = extract(b"", "txt").unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.metadata.char_count, 0);
    }

    #[test]
    fn test_extractor_builder() {
        let extractor = Extractor::new()
            .with_ocr(Arc::new(NoOcr))
            .with_pdf_options(PdfOptions::new().with_sparse_threshold(10).with_ocr_dpi(150));

        assert_eq!(extractor.options().pdf.sparse_text_threshold, 10);
        assert_eq!(extractor.options().pdf.ocr_dpi, 150);
        assert_eq!(extractor.options().ocr.name(), "none");
    }

    #[test]
    fn test_extractor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Extractor>();
    }
}
