//! Format parsers: PDF, DOCX and plain text.

mod backend;
mod docx;
mod encoding;
mod layout;
mod options;
mod pdf;
mod table_detector;
mod text;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use docx::{
    body_elements, docx_blocks, extract_docx, format_paragraph, BodyElement, Paragraph, StyleMap,
};
pub use encoding::{decode_detected, decode_lossy, detect_encoding, DetectedEncoding};
pub use layout::{extract_page_spans, group_spans_into_lines, lines_to_text, TextLine, TextSpan};
pub use options::{ErrorMode, PdfOptions, OCR_DPI, SPARSE_TEXT_THRESHOLD};
pub use pdf::{extract_pdf, PdfExtraction, PDF_METHOD};
pub use table_detector::{DetectedTable, TableDetector};
pub use text::extract_text;
