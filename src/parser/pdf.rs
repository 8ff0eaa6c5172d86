//! PDF structural extraction with OCR fallback for sparse pages.

use crate::error::Result;
use crate::ocr::OcrEngine;
use crate::render::{join_non_empty, table_to_markdown, BLOCK_SEPARATOR};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::layout::{extract_page_spans, group_spans_into_lines, lines_to_text, TextSpan};
use super::options::{ErrorMode, PdfOptions};
use super::table_detector::TableDetector;

/// Extraction method label for PDFs.
pub const PDF_METHOD: &str = "lopdf";

/// Text and counters extracted from a PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExtraction {
    /// Page texts joined by a blank line
    pub text: String,
    /// Total number of pages in the document
    pub page_count: u32,
    /// Number of pages whose text came from OCR
    pub ocr_pages: u32,
    /// Number of tables rendered into the text
    pub table_count: usize,
}

impl PdfExtraction {
    /// Method label: `lopdf`, or `lopdf+ocr(N/M)` when OCR replaced N of M pages.
    pub fn method(&self) -> String {
        if self.ocr_pages > 0 {
            format!("{}+ocr({}/{})", PDF_METHOD, self.ocr_pages, self.page_count)
        } else {
            PDF_METHOD.to_string()
        }
    }

    /// Whether OCR text was used on at least one page.
    pub fn ocr_applied(&self) -> bool {
        self.ocr_pages > 0
    }
}

/// Extract the text of a PDF document.
///
/// Each page contributes its text layer, replaced by OCR output when the
/// page is sparse and OCR produced strictly more text, followed by any
/// tables detected on the page rendered as markdown.
pub fn extract_pdf(data: &[u8], options: &PdfOptions, ocr: &dyn OcrEngine) -> Result<PdfExtraction> {
    let backend = LopdfBackend::load_bytes(data)?;
    let pages = backend.pages();
    let page_count = pages.len() as u32;
    log::debug!("PDF {} with {} pages", backend.version(), page_count);

    let ocr_available = ocr.is_available();
    let detector = TableDetector::new();

    let mut page_texts = Vec::with_capacity(pages.len());
    let mut ocr_pages = 0;
    let mut table_count = 0;

    for (&page_number, &page_id) in &pages {
        let spans = page_spans(&backend, page_number, page_id, options.error_mode)?;
        let mut text = lines_to_text(&group_spans_into_lines(spans.clone()))
            .trim()
            .to_string();

        let text_chars = text.chars().count();
        if text_chars < options.sparse_text_threshold && ocr_available {
            match ocr.recognize_page(data, page_number, options.ocr_dpi) {
                Ok(recognized) => {
                    let recognized = recognized.trim();
                    if recognized.chars().count() > text_chars {
                        text = recognized.to_string();
                        ocr_pages += 1;
                    }
                }
                Err(e) => log::warn!("OCR failed on page {}: {}", page_number, e),
            }
        }

        if options.detect_tables {
            for markdown in page_tables(&detector, &spans, page_number) {
                text.push_str(BLOCK_SEPARATOR);
                text.push_str(&markdown);
                table_count += 1;
            }
        }

        page_texts.push(text);
    }

    Ok(PdfExtraction {
        text: join_non_empty(page_texts),
        page_count,
        ocr_pages,
        table_count,
    })
}

/// Read a page's text layer, honoring the error mode.
fn page_spans<B: PdfBackend + ?Sized>(
    backend: &B,
    page_number: u32,
    page_id: PageId,
    error_mode: ErrorMode,
) -> Result<Vec<TextSpan>> {
    match extract_page_spans(backend, page_id) {
        Ok(spans) => Ok(spans),
        Err(e) if error_mode == ErrorMode::Lenient => {
            log::warn!("Unreadable text layer on page {}: {}", page_number, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Detect tables on a page and render the non-empty ones.
///
/// Detection failures are contained to the page.
fn page_tables(detector: &TableDetector, spans: &[TextSpan], page_number: u32) -> Vec<String> {
    match detector.find_tables(spans) {
        Ok(tables) => tables
            .iter()
            .map(table_to_markdown)
            .filter(|markdown| !markdown.is_empty())
            .collect(),
        Err(e) => {
            log::debug!("Table detection failed on page {}: {}", page_number, e);
            Vec::new()
        }
    }
}
