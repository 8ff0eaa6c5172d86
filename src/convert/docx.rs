//! DOCX document converter implementation.

use crate::error::Result;
use crate::parser::extract_docx;

use super::{ConvertResult, DocumentConverter, ExtractOptions};

/// Extraction method label for word-processing packages.
pub const DOCX_METHOD: &str = "ooxml";

/// DOCX document converter.
///
/// Legacy `doc` tags are routed here too; binary Word files fail as
/// malformed packages.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    _private: (),
}

impl DocxConverter {
    /// Create a new DOCX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx", "doc"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn convert_bytes(&self, bytes: &[u8], _options: &ExtractOptions) -> Result<ConvertResult> {
        let text = extract_docx(bytes)?;
        Ok(ConvertResult::new(text, DOCX_METHOD))
    }
}
