//! Character encoding detection for plain text inputs.
//!
//! Detection order:
//! 1. Byte order mark
//! 2. Strict UTF-8 validation
//! 3. "Mostly UTF-8": well-formed multi-byte sequences outnumber invalid ones
//! 4. Broken UTF-8: every invalid sequence is a lead byte cut short by a
//!    non-letter, as left behind by truncation or bad splicing
//! 5. chardetng statistical detection, only when it is confident
//! 6. UTF-8 fallback
//!
//! Decoding is always lossy: undecodable sequences become U+FFFD.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Result of encoding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedEncoding {
    /// Encoding to decode with
    pub encoding: &'static Encoding,
    /// Whether a detector vouched for the guess (false for the UTF-8 fallback)
    pub confident: bool,
    /// Length of the byte order mark to skip
    pub bom_len: usize,
}

impl DetectedEncoding {
    fn new(encoding: &'static Encoding, confident: bool) -> Self {
        Self {
            encoding,
            confident,
            bom_len: 0,
        }
    }

    /// WHATWG name of the encoding (e.g., "UTF-8", "windows-1252").
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Detect the most probable encoding of a byte buffer.
pub fn detect_encoding(data: &[u8]) -> DetectedEncoding {
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        return DetectedEncoding {
            encoding,
            confident: true,
            bom_len,
        };
    }

    if std::str::from_utf8(data).is_ok() {
        return DetectedEncoding::new(UTF_8, true);
    }

    let scan = Utf8Scan::of(data);
    if scan.valid_multibyte > scan.invalid {
        log::debug!(
            "Treating input as damaged UTF-8 ({} valid multi-byte, {} invalid sequences)",
            scan.valid_multibyte,
            scan.invalid
        );
        return DetectedEncoding::new(UTF_8, true);
    }
    if scan.only_broken_leads {
        log::debug!(
            "Treating input as UTF-8 with {} broken sequences",
            scan.invalid
        );
        return DetectedEncoding::new(UTF_8, true);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let (encoding, confident) = detector.guess_assess(None, true);

    if confident {
        return DetectedEncoding::new(encoding, true);
    }

    log::debug!(
        "No confident encoding guess (best: {}), falling back to UTF-8",
        encoding.name()
    );
    DetectedEncoding::new(UTF_8, false)
}

/// Decode bytes with the given encoding, replacing undecodable sequences.
pub fn decode_lossy(data: &[u8], encoding: &'static Encoding) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(data);
    if had_errors {
        log::debug!("Lossy decode with {} replaced invalid sequences", encoding.name());
    }
    text.into_owned()
}

/// Detect the encoding of `data` and decode it, stripping any BOM.
pub fn decode_detected(data: &[u8]) -> (String, DetectedEncoding) {
    let detected = detect_encoding(data);
    let text = decode_lossy(&data[detected.bom_len..], detected.encoding);
    (text, detected)
}

/// Tally of a UTF-8 validation pass over possibly damaged input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Utf8Scan {
    /// Well-formed sequences longer than one byte
    valid_multibyte: usize,
    /// Invalid or truncated sequences
    invalid: usize,
    /// Every invalid sequence starts with a UTF-8 lead byte whose next byte
    /// is not an ASCII letter
    only_broken_leads: bool,
}

impl Utf8Scan {
    fn of(mut data: &[u8]) -> Self {
        let mut scan = Self {
            valid_multibyte: 0,
            invalid: 0,
            only_broken_leads: true,
        };

        loop {
            match std::str::from_utf8(data) {
                Ok(s) => {
                    scan.valid_multibyte += count_multibyte(s);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = data.split_at(e.valid_up_to());
                    scan.valid_multibyte += std::str::from_utf8(valid)
                        .map(count_multibyte)
                        .unwrap_or_default();
                    scan.invalid += 1;

                    match e.error_len() {
                        Some(len) => {
                            scan.only_broken_leads &= is_broken_lead(rest);
                            data = &rest[len..];
                        }
                        // Truncated sequence at the end of input
                        None => break,
                    }
                }
            }
        }

        scan.only_broken_leads &= scan.invalid > 0;
        scan
    }
}

/// A UTF-8 lead byte followed by something other than a letter.
///
/// Legacy single-byte text puts its high bytes inside words (`ch\xE2teau`),
/// so a lead byte followed by a letter reads as a legacy accented character.
fn is_broken_lead(sequence: &[u8]) -> bool {
    match sequence {
        [lead, next, ..] => (0xC2..=0xF4).contains(lead) && !next.is_ascii_alphabetic(),
        _ => false,
    }
}

fn count_multibyte(s: &str) -> usize {
    s.chars().filter(|c| c.len_utf8() > 1).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

    #[test]
    fn test_detect_ascii_and_utf8() {
        assert_eq!(detect_encoding(b"plain ascii").encoding, UTF_8);
        assert_eq!(detect_encoding("héllo wörld".as_bytes()).encoding, UTF_8);
        assert!(detect_encoding(b"").confident);
    }

    #[test]
    fn test_detect_bom() {
        let detected = detect_encoding(b"\xEF\xBB\xBFhello");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.bom_len, 3);

        assert_eq!(detect_encoding(b"\xFF\xFEh\x00i\x00").encoding, UTF_16LE);
        assert_eq!(detect_encoding(b"\xFE\xFF\x00h\x00i").encoding, UTF_16BE);
    }

    #[test]
    fn test_decode_detected_strips_bom() {
        let (text, _) = decode_detected(b"\xEF\xBB\xBFhello");
        assert_eq!(text, "hello");

        let (text, detected) = decode_detected(b"\xFF\xFEh\x00i\x00");
        assert_eq!(text, "hi");
        assert_eq!(detected.name(), "UTF-16LE");
    }

    #[test]
    fn test_damaged_utf8_stays_utf8() {
        let mut data = "héllo wörld ".as_bytes().to_vec();
        data.push(0xC3);
        data.extend_from_slice(b"( end");

        let detected = detect_encoding(&data);
        assert_eq!(detected.encoding, UTF_8);

        let (text, _) = decode_detected(&data);
        assert_eq!(text, "héllo wörld \u{FFFD}( end");
    }

    #[test]
    fn test_utf8_scan_counts() {
        let scan = Utf8Scan::of("é".as_bytes());
        assert_eq!((scan.valid_multibyte, scan.invalid), (1, 0));
        assert!(!scan.only_broken_leads);

        let scan = Utf8Scan::of(b"a\xFFb\xFE");
        assert_eq!((scan.valid_multibyte, scan.invalid), (0, 2));
        assert!(!scan.only_broken_leads);

        let scan = Utf8Scan::of(b"ok\xE2\x82");
        assert_eq!((scan.valid_multibyte, scan.invalid), (0, 1));
    }

    #[test]
    fn test_utf8_scan_broken_leads() {
        assert!(Utf8Scan::of(b"hello \xC3( world").only_broken_leads);
        assert!(Utf8Scan::of(b"a \xE2\x82. b \xC5 c").only_broken_leads);
        // Lead byte inside a word reads as legacy text
        assert!(!Utf8Scan::of(b"Le ch\xE2teau").only_broken_leads);
        assert!(!Utf8Scan::of(b"ok \xC3( and \xFF").only_broken_leads);
    }

    #[test]
    fn test_broken_utf8_in_ascii_text() {
        let detected = detect_encoding(b"hello \xC3( world, this is plain text");
        assert_eq!(detected.encoding, UTF_8);
        assert!(detected.confident);

        let (text, _) = decode_detected(b"caf\xC3( ok");
        assert_eq!(text, "caf\u{FFFD}( ok");
    }

    #[test]
    fn test_decode_lossy_windows_1252() {
        let text = decode_lossy(b"cr\xE8me br\xFBl\xE9e", WINDOWS_1252);
        assert_eq!(text, "crème brûlée");
    }

    #[test]
    fn test_decode_lossy_utf8_replaces() {
        let text = decode_lossy(b"abc\xFFdef", UTF_8);
        assert_eq!(text, "abc\u{FFFD}def");
    }
}
