//! Format router: a registry of converters keyed by file type tag.
//!
//! Each supported format is a [`DocumentConverter`] declaring the tags it
//! handles. The registry normalizes the caller's tag, dispatches to the
//! matching converter and wraps its output with extraction metadata.
//!
//! # Example
//!
//! ```no_run
//! use santa_extract::convert::{ConverterRegistry, ExtractOptions};
//!
//! fn main() -> santa_extract::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let data = std::fs::read("report.docx")?;
//!
//!     let result = registry.extract(&data, "docx", &ExtractOptions::default())?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

mod docx;
mod pdf;
mod text;

pub use docx::DocxConverter;
pub use pdf::PdfConverter;
pub use text::TextConverter;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::detect::normalize_file_type;
use crate::error::{Error, Result};
use crate::model::{ExtractionMetadata, ExtractionResult};
use crate::ocr::{NoOcr, OcrEngine};
use crate::parser::PdfOptions;

/// Options shared by every converter for one extraction.
#[derive(Clone)]
pub struct ExtractOptions {
    /// PDF extraction options
    pub pdf: PdfOptions,

    /// OCR provider for sparse PDF pages
    pub ocr: Arc<dyn OcrEngine>,
}

impl ExtractOptions {
    /// Create new extraction options with OCR disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set PDF options.
    pub fn with_pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf = options;
        self
    }

    /// Set the OCR provider.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = ocr;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pdf: PdfOptions::default(),
            ocr: Arc::new(NoOcr),
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("pdf", &self.pdf)
            .field("ocr", &self.ocr.name())
            .finish()
    }
}

/// Output of a single converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    /// Extracted text
    pub text: String,

    /// Page count, for paginated formats
    pub page_count: Option<u32>,

    /// Strategy that produced the text
    pub method: String,

    /// Whether OCR contributed text
    pub ocr_applied: bool,

    /// Number of tables rendered into the text
    pub table_count: usize,
}

impl ConvertResult {
    /// Create a result for a non-paginated format.
    pub fn new(text: String, method: impl Into<String>) -> Self {
        Self {
            text,
            page_count: None,
            method: method.into(),
            ocr_applied: false,
            table_count: 0,
        }
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// Get the file type tags handled by this converter.
    ///
    /// Tags should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Extract text from a document held in memory.
    fn convert_bytes(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ConvertResult>;

    /// Check if this converter handles the given tag.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = normalize_file_type(ext);
        self.supported_extensions().iter().any(|e| *e == ext)
    }
}

/// Registry for document converters.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, DOCX and text converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry.register(Arc::new(DocxConverter::new()));
        registry.register(Arc::new(TextConverter::new()));
        registry
    }

    /// Register a converter for all its tags.
    ///
    /// A later registration replaces an earlier one for the same tag.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(normalize_file_type(ext), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file type tag.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&normalize_file_type(ext)).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a tag is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&normalize_file_type(ext))
    }

    /// Get all supported tags, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Extract text from `bytes`, dispatching on `file_type`.
    ///
    /// The tag is trimmed, lowercased and stripped of leading dots before
    /// lookup. Unknown tags fail with [`Error::UnsupportedFormat`] without
    /// invoking any converter.
    pub fn extract(
        &self,
        bytes: &[u8],
        file_type: &str,
        options: &ExtractOptions,
    ) -> Result<ExtractionResult> {
        let tag = normalize_file_type(file_type);
        let converter = self
            .converters
            .get(&tag)
            .ok_or_else(|| Error::UnsupportedFormat(file_type.to_string()))?;

        log::debug!(
            "Extracting {} bytes as {} with {}",
            bytes.len(),
            tag,
            converter.name()
        );

        let started = Instant::now();
        let converted = converter.convert_bytes(bytes, options)?;
        let extraction_time_ms = started.elapsed().as_millis() as u64;

        let metadata = ExtractionMetadata {
            file_type: tag,
            page_count: converted.page_count,
            char_count: converted.text.chars().count(),
            extraction_method: converted.method,
            extraction_time_ms,
            ocr_applied: converted.ocr_applied,
            table_count: converted.table_count,
        };

        Ok(ExtractionResult {
            text: converted.text,
            metadata,
        })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
