//! Character encoding detection for plain text files.
//!
//! Text files arrive in whatever encoding the producing system used.
//! Detection priority:
//! 1. BOM (Byte Order Mark) - most reliable
//! 2. UTF-8 validation - if valid UTF-8, assume UTF-8
//! 3. chardetng statistical detection - for legacy encodings

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Detected character encoding of a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// UTF-8, with or without BOM
    Utf8,
    /// UTF-16 Little Endian
    Utf16Le,
    /// UTF-16 Big Endian
    Utf16Be,
    /// Legacy encoding detected by chardetng (e.g., ISO-8859-1, Windows-1252)
    Legacy(&'static Encoding),
}

/// UTF-8 BOM: EF BB BF
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
/// UTF-16 LE BOM: FF FE
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
/// UTF-16 BE BOM: FE FF
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Detect the character encoding of a byte buffer.
pub fn detect_encoding(buffer: &[u8]) -> DetectedEncoding {
    if buffer.starts_with(UTF8_BOM) {
        return DetectedEncoding::Utf8;
    }
    if buffer.starts_with(UTF16_LE_BOM) {
        return DetectedEncoding::Utf16Le;
    }
    if buffer.starts_with(UTF16_BE_BOM) {
        return DetectedEncoding::Utf16Be;
    }

    if std::str::from_utf8(buffer).is_ok() {
        return DetectedEncoding::Utf8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(buffer, true);
    let encoding = detector.guess(None, true);

    if encoding == UTF_8 {
        // chardetng fell back to UTF-8 but validation already failed;
        // decode lossily as UTF-8 anyway
        DetectedEncoding::Utf8
    } else {
        DetectedEncoding::Legacy(encoding)
    }
}

/// Decode a byte buffer to a UTF-8 string.
///
/// Replacement characters (U+FFFD) may be inserted for invalid sequences.
pub fn decode_to_utf8(buffer: &[u8]) -> String {
    match detect_encoding(buffer) {
        DetectedEncoding::Utf8 => {
            let data = buffer.strip_prefix(UTF8_BOM).unwrap_or(buffer);
            String::from_utf8_lossy(data).into_owned()
        }
        DetectedEncoding::Utf16Le => {
            let (text, _, _) = UTF_16LE.decode(buffer);
            text.into_owned()
        }
        DetectedEncoding::Utf16Be => {
            let (text, _, _) = UTF_16BE.decode(buffer);
            text.into_owned()
        }
        DetectedEncoding::Legacy(encoding) => {
            let (text, _, _) = encoding.decode(buffer);
            text.into_owned()
        }
    }
}
