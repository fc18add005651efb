//! Byte-to-text decoding for delimited exports.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use respat_model::TextEncoding;

/// Decode raw file bytes.
///
/// A byte-order mark, when present, wins over the configured encoding.
/// Latin-1 is decoded as windows-1252, its superset used by spreadsheet exports.
pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    if let Some((detected, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = detected.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }
    let target = match encoding {
        TextEncoding::Utf8 => UTF_8,
        TextEncoding::Latin1 => WINDOWS_1252,
    };
    let (text, had_errors) = target.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(
            encoding = target.name(),
            "input contains invalid byte sequences; replaced with U+FFFD"
        );
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_bytes_decode() {
        let bytes = b"V\xedrus";
        assert_eq!(decode_text(bytes, TextEncoding::Latin1), "Vírus");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let bytes = b"\xef\xbb\xbfcodigo";
        assert_eq!(decode_text(bytes, TextEncoding::Latin1), "codigo");
    }
}
