//! Plain text and markdown converter implementation.

use crate::error::Result;
use crate::parser::extract_text;

use super::{ConvertResult, DocumentConverter, ExtractOptions};

/// Extraction method label for decoded text files.
pub const TEXT_METHOD: &str = "chardetng";

/// Converter for plain text and markdown files.
///
/// Never fails: undecodable bytes become U+FFFD.
#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    _private: (),
}

impl TextConverter {
    /// Create a new text converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for TextConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text", "md", "markdown"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn convert_bytes(&self, bytes: &[u8], _options: &ExtractOptions) -> Result<ConvertResult> {
        Ok(ConvertResult::new(extract_text(bytes), TEXT_METHOD))
    }
}
