//! File type normalization and content sniffing.

use std::path::Path;

/// File type tags accepted by the default converters.
pub const SUPPORTED_FILE_TYPES: &[&str] = &["pdf", "docx", "doc", "txt", "text", "md", "markdown"];

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept a header that appears within the first 1024 bytes.
const PDF_HEADER_SEARCH_WINDOW: usize = 1024;

/// Local file header signature of a ZIP archive (OOXML packages).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Normalize a file type tag: trim, lowercase, strip leading dots.
///
/// # Example
/// ```
/// use santa_extract::detect::normalize_file_type;
///
/// assert_eq!(normalize_file_type(".PDF"), "pdf");
/// assert_eq!(normalize_file_type(" Markdown "), "markdown");
/// ```
pub fn normalize_file_type(file_type: &str) -> String {
    file_type.trim().to_lowercase().trim_start_matches('.').to_string()
}

/// Check whether a (not yet normalized) tag is one of [`SUPPORTED_FILE_TYPES`].
pub fn is_supported_file_type(file_type: &str) -> bool {
    let normalized = normalize_file_type(file_type);
    SUPPORTED_FILE_TYPES.contains(&normalized.as_str())
}

/// Infer a file type tag from a file name's extension.
///
/// Returns `None` when the name has no extension.
pub fn file_type_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(normalize_file_type)
}

/// Guess a file type tag from the leading bytes of a buffer.
///
/// Only recognizes PDF and ZIP-based (DOCX) containers; anything else is
/// left to the caller.
pub fn sniff_file_type(data: &[u8]) -> Option<&'static str> {
    if pdf_version(data).is_some() {
        Some("pdf")
    } else if data.starts_with(ZIP_MAGIC) {
        Some("docx")
    } else {
        None
    }
}

/// Find the PDF header and return its version string (e.g., "1.7").
pub fn pdf_version(data: &[u8]) -> Option<String> {
    let window = &data[..data.len().min(PDF_HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)?;

    let version_start = start + PDF_MAGIC.len();
    let version_bytes = data.get(version_start..version_start + VERSION_LEN)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if is_valid_version(&version) {
        Some(version)
    } else {
        None
    }
}

/// Check if bytes carry a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_some()
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}
