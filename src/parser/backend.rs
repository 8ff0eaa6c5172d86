//! PDF backend abstraction layer.
//!
//! Keeps the concrete PDF library (lopdf) behind a trait so the page
//! interpreter in `layout` only deals with decoded operations and text.

use std::collections::BTreeMap;

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `index`, or `default` when absent or not a number.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(PdfValue::as_number)
            .unwrap_or(default)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), in page order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the decompressed content stream bytes for a page.
    ///
    /// A page without a `Contents` entry has an empty content stream.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to [`decode_text_simple`] if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Decode a string operand without font information: UTF-16BE when it
/// carries a BOM, else UTF-8, else windows-1252.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return UTF_16BE.decode_without_bom_handling(utf16).0.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    ///
    /// Fails with a malformed-document error when the buffer is not a PDF
    /// container or is encrypted with a non-empty password.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// PDF version from the document header (e.g., "1.7").
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn stream_content(&self, object: &Object) -> Result<Vec<u8>> {
        let object = match object {
            Object::Reference(r) => self.doc.get_object(*r)?,
            other => other,
        };
        match object {
            // Unfiltered streams have no decompressed form
            Object::Stream(s) => Ok(s
                .decompressed_content()
                .unwrap_or_else(|_| s.content.clone())),
            _ => Err(Error::malformed_pdf("content entry is not a stream")),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let contents = match contents {
            Object::Reference(r) => self.doc.get_object(*r)?,
            other => other,
        };

        match contents {
            Object::Array(parts) => {
                let mut content = Vec::new();
                for part in parts {
                    match self.stream_content(part) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::debug!("Skipping unreadable content stream part: {}", e),
                    }
                }
                Ok(content)
            }
            stream => self.stream_content(stream),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        let fonts = match self.doc.get_page_fonts(page) {
            Ok(fonts) => fonts,
            Err(_) => return decode_text_simple(bytes),
        };

        fonts
            .get(font_name)
            .and_then(|font| font.get_font_encoding(&self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_single_byte() {
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0x93, 0x61, 0x94]), "\u{201C}a\u{201D}");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_content_op_number() {
        let op = ContentOp {
            operator: "Td".to_string(),
            operands: vec![PdfValue::Integer(72), PdfValue::Real(1.5), PdfValue::Other],
        };
        assert_eq!(op.number(0, 0.0), 72.0);
        assert_eq!(op.number(1, 0.0), 1.5);
        assert_eq!(op.number(2, 9.0), 9.0);
        assert_eq!(op.number(5, 4.0), 4.0);
    }

    #[test]
    fn test_load_bytes_rejects_garbage() {
        let err = LopdfBackend::load_bytes(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, Error::MalformedDocument { format: "pdf", .. }));
    }
}
