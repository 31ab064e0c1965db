//! XML Entity Decoding
//!
//! Handles decoding of XML entities in text runs and attribute values:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//! - A handful of HTML named entities that design tools leave in SVG exports
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in `input`
///
/// Returns Borrowed if no entities are present. Unknown named entities are
/// kept verbatim; a reference without a terminating `;` or a character
/// reference to a non-XML character is an error.
pub fn decode_text(input: &[u8]) -> Result<Cow<'_, [u8]>, &'static str> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while let Some(amp_offset) = memchr(b'&', &input[pos..]) {
        result.extend_from_slice(&input[pos..pos + amp_offset]);
        pos += amp_offset;

        let semi_offset = memchr(b';', &input[pos..]).ok_or("malformed entity reference")?;
        let entity = &input[pos + 1..pos + semi_offset];

        match decode_entity(entity)? {
            Some(decoded) => result.extend_from_slice(decoded.encode_utf8(&mut [0; 4]).as_bytes()),
            None => result.extend_from_slice(&input[pos..=pos + semi_offset]),
        }
        pos += semi_offset + 1;
    }
    result.extend_from_slice(&input[pos..]);

    Ok(Cow::Owned(result))
}

/// Decode a single entity (without & and ;)
///
/// `Ok(None)` means a well-formed but unknown named entity.
fn decode_entity(entity: &[u8]) -> Result<Option<char>, &'static str> {
    match entity {
        [] => Err("empty entity reference"),
        [b'#', rest @ ..] => decode_char_ref(rest).map(Some).ok_or("invalid character reference"),
        b"lt" => Ok(Some('<')),
        b"gt" => Ok(Some('>')),
        b"amp" => Ok(Some('&')),
        b"quot" => Ok(Some('"')),
        b"apos" => Ok(Some('\'')),
        b"nbsp" => Ok(Some('\u{00A0}')),
        b"copy" => Ok(Some('\u{00A9}')),
        b"reg" => Ok(Some('\u{00AE}')),
        b"trade" => Ok(Some('\u{2122}')),
        b"mdash" => Ok(Some('\u{2014}')),
        b"ndash" => Ok(Some('\u{2013}')),
        b"hellip" => Ok(Some('\u{2026}')),
        name if name.iter().all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')) => {
            Ok(None)
        }
        _ => Err("malformed entity reference"),
    }
}

/// Decode a numeric character reference body (`65` or `x41`)
fn decode_char_ref(body: &[u8]) -> Option<char> {
    let codepoint = match body {
        [b'x' | b'X', hex @ ..] if !hex.is_empty() => {
            u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?
        }
        dec if !dec.is_empty() => std::str::from_utf8(dec).ok()?.parse::<u32>().ok()?,
        _ => return None,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}
