//! PDF extraction options.

/// Pages whose trimmed text layer has fewer characters than this are
/// candidates for OCR.
pub const SPARSE_TEXT_THRESHOLD: usize = 50;

/// Resolution used when rendering a page for OCR.
pub const OCR_DPI: u32 = 300;

/// Options for extracting PDF documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    /// Error handling mode for per-page text layer failures
    pub error_mode: ErrorMode,

    /// Character count below which a page is considered sparse
    pub sparse_text_threshold: usize,

    /// Render resolution for OCR, in dots per inch
    pub ocr_dpi: u32,

    /// Whether to run table detection on each page
    pub detect_tables: bool,
}

impl PdfOptions {
    /// Create new PDF options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole document when a page's text layer cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the sparse page threshold.
    pub fn with_sparse_threshold(mut self, chars: usize) -> Self {
        self.sparse_text_threshold = chars;
        self
    }

    /// Set the OCR render resolution.
    pub fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr_dpi = dpi;
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            sparse_text_threshold: SPARSE_TEXT_THRESHOLD,
            ocr_dpi: OCR_DPI,
            detect_tables: true,
        }
    }
}

/// Error handling mode for page-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Treat the failing page's text layer as empty and continue
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_options_builder() {
        let options = PdfOptions::new()
            .strict()
            .with_sparse_threshold(10)
            .with_ocr_dpi(150)
            .with_tables(false);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.sparse_text_threshold, 10);
        assert_eq!(options.ocr_dpi, 150);
        assert!(!options.detect_tables);
    }

    #[test]
    fn test_default_options() {
        let options = PdfOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.sparse_text_threshold, 50);
        assert_eq!(options.ocr_dpi, 300);
        assert!(options.detect_tables);
    }
}
