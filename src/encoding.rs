//! Character encoding detection and transcoding.
//!
//! Wikitext dumps and API responses are UTF-8, but files saved by other
//! tools sometimes carry a UTF-16 byte order mark. A BOM selects the
//! encoding; anything else is decoded as UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// Detect the encoding of `bytes` from its byte order mark.
///
/// Returns the encoding and the length of the BOM, or UTF-8 and 0 when
/// there is none.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    Encoding::for_bom(bytes).unwrap_or((UTF_8, 0))
}

/// Transcode `bytes` to a UTF-8 string.
///
/// The BOM is dropped. Invalid sequences become U+FFFD rather than
/// causing errors.
///
/// # Examples
///
/// ```
/// use rs_wikirefs::encoding::transcode_to_utf8;
///
/// let wikitext = b"\xEF\xBB\xBFThe island.<ref>x</ref>";
/// assert_eq!(transcode_to_utf8(wikitext), "The island.<ref>x</ref>");
/// ```
#[must_use]
pub fn transcode_to_utf8(bytes: &[u8]) -> String {
    let (encoding, bom_len) = detect_encoding(bytes);
    let body = &bytes[bom_len..];

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced invalid byte sequences");
    }
    decoded.into_owned()
}
