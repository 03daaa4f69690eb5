//! Shared text helpers: input decoding and whitespace handling.

use std::borrow::Cow;

/// Decode an input file to a string.
///
/// The declared encoding of an XML prolog is used as the hint for
/// [`decode_text`].
pub fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_xml_encoding(bytes))
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding declared in an XML prolog.
///
/// Only the first 100 bytes are checked.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];
    let decl_end = after_xml
        .windows(2)
        .position(|w| w == b"?>")
        .unwrap_or(after_xml.len());
    let decl = &after_xml[..decl_end];

    let enc_pos = decl
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &decl[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_end = rest.iter().position(|&b| b == quote)?;

    std::str::from_utf8(&rest[..value_end]).ok()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Body of an XML or HTML comment carrying `text`.
///
/// `--` may not appear inside a comment, so runs of dashes are broken up.
pub fn comment_body(text: &str) -> String {
    let mut body = collapse_whitespace(text);
    while body.contains("--") {
        body = body.replace("--", "- -");
    }
    format!(" {body} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF<document/>";
        assert_eq!(decode_input(bytes), "<document/>");
    }

    #[test]
    fn test_decode_declared_encoding() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><p>caf\xE9</p>";
        assert_eq!(extract_xml_encoding(bytes), Some("iso-8859-1"));
        assert!(decode_input(bytes).contains("caf\u{e9}"));
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        let bytes = b"<p>\x93quoted\x94</p>";
        assert_eq!(extract_xml_encoding(bytes), None);
        assert_eq!(decode_input(bytes), "<p>\u{201c}quoted\u{201d}</p>");
    }

    #[test]
    fn test_extract_xml_encoding_single_quotes() {
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' encoding='utf-8'?>"),
            Some("utf-8")
        );
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\"?><a encoding=\"x\"/>"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n  b\tc  "), "a b c");
        assert_eq!(collapse_whitespace("\n"), "");
    }

    #[test]
    fn test_comment_body() {
        assert_eq!(comment_body("a -- b"), " a - - b ");
        assert_eq!(comment_body("---"), " - - - ");
        assert!(!comment_body("x----y").contains("--"));
    }
}
