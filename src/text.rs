//! Byte-to-text decoding for archive entries.

use std::borrow::Cow;

/// Decode an entry's bytes, honouring an XML declaration's encoding if the
/// bytes are not valid UTF-8.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    decode_with_hint(bytes, declared_encoding(bytes))
}

/// Decode bytes as UTF-8, or, when that fails, as the encoding labelled
/// `hint` (falling back to Windows-1252 for a missing or unknown label).
///
/// A byte order mark wins over both: encoding_rs sniffs UTF-8 and UTF-16
/// BOMs and strips them.
pub fn decode_with_hint<'a>(bytes: &'a [u8], hint: Option<&str>) -> Cow<'a, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    let fallback = hint
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    fallback.decode(bytes).0
}

/// Encoding named by an XML declaration, looked for in the first 100 bytes.
pub fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..end]).ok()
}
