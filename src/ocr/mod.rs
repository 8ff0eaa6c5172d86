//! OCR providers for sparse PDF pages.
//!
//! OCR is a capability injected into extraction: [`NoOcr`] is the null
//! provider used when OCR is disabled, [`TesseractOcr`] renders pages with
//! poppler's `pdftoppm` and recognizes them with `tesseract`.

mod process;
mod tesseract;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub use process::run_with_timeout;
pub use tesseract::TesseractOcr;

/// Upper bound for each OCR subprocess.
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(60);

/// Tesseract language used when none is configured.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// A provider that turns a rendered PDF page into text.
///
/// Implementations must be stateless across calls so one provider can be
/// shared by concurrent extractions.
pub trait OcrEngine: Send + Sync {
    /// Short provider name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether the provider can run at all (tools installed, enabled).
    fn is_available(&self) -> bool;

    /// Recognize the text of page `page_number` (1-based) of a PDF document
    /// rendered at `dpi`.
    fn recognize_page(&self, document: &[u8], page_number: u32, dpi: u32) -> Result<String>;
}

/// The null OCR provider: never available, never recognizes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn recognize_page(&self, _document: &[u8], page_number: u32, _dpi: u32) -> Result<String> {
        Err(Error::Ocr(format!(
            "OCR is disabled, cannot recognize page {}",
            page_number
        )))
    }
}

/// Configuration for the Tesseract OCR provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Maximum run time of each external process
    pub timeout: Duration,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,

    /// Page renderer executable
    pub pdftoppm: PathBuf,

    /// Tesseract executable
    pub tesseract: PathBuf,
}

impl OcrConfig {
    /// Create a new OCR configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-process timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the Tesseract language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set explicit tool locations instead of looking them up on `PATH`.
    pub fn with_tools(mut self, pdftoppm: impl Into<PathBuf>, tesseract: impl Into<PathBuf>) -> Self {
        self.pdftoppm = pdftoppm.into();
        self.tesseract = tesseract.into();
        self
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_OCR_TIMEOUT,
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: PathBuf::from("tesseract"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ocr() {
        let engine = NoOcr;
        assert_eq!(engine.name(), "none");
        assert!(!engine.is_available());
        assert!(matches!(
            engine.recognize_page(b"%PDF-1.4", 1, 300),
            Err(Error::Ocr(_))
        ));
    }

    #[test]
    fn test_ocr_config_builder() {
        let config = OcrConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_language("eng+deu")
            .with_tools("/opt/poppler/pdftoppm", "/opt/tess/tesseract");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.language, "eng+deu");
        assert_eq!(config.pdftoppm, PathBuf::from("/opt/poppler/pdftoppm"));
        assert_eq!(config.tesseract, PathBuf::from("/opt/tess/tesseract"));
    }

    #[test]
    fn test_ocr_config_defaults() {
        let config = OcrConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.language, "eng");
    }
}
