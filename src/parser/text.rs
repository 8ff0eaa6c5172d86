//! Plain text and markdown extraction.

use super::encoding::decode_detected;

/// Decode a presumed text file to a string.
///
/// Never fails: the encoding is detected (see [`super::encoding`]) and
/// undecodable sequences are replaced with U+FFFD. A leading byte order
/// mark is removed.
pub fn extract_text(data: &[u8]) -> String {
    let (text, detected) = decode_detected(data);
    log::debug!(
        "Decoded {} bytes as {} (confident: {})",
        data.len(),
        detected.name(),
        detected.confident
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_utf8() {
        assert_eq!(extract_text("# Notes\n\n- café".as_bytes()), "# Notes\n\n- café");
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract_text(b""), "");
    }

    #[test]
    fn test_extract_keeps_whitespace() {
        assert_eq!(extract_text(b"  indented\n\n"), "  indented\n\n");
    }

    #[test]
    fn test_extract_utf8_bom() {
        assert_eq!(extract_text(b"\xEF\xBB\xBFtitle"), "title");
    }

    #[test]
    fn test_extract_invalid_never_fails() {
        let text = extract_text(&[0xFF, 0xFE, 0xFD, 0x80, 0x81]);
        assert!(!text.is_empty());
    }
}
