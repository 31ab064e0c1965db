//! XML Attribute Parsing
//!
//! Parses the attribute list of a start tag (the bytes between the element
//! name and `>` / `/>`). Values must be quoted; entity references inside
//! values are decoded.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix, e.g. `xlink:href`)
    pub name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Returns the first well-formedness violation as an error message.
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute<'_>>, &'static str> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if !attrs.is_empty() && pos == ws_start {
            return Err("attributes must be separated by whitespace");
        }

        // Parse attribute name
        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err("attribute name must start with a letter, underscore, or colon");
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        // Skip whitespace around '='
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if input.get(pos) != Some(&b'=') {
            return Err("attribute value required");
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err("attribute value must be quoted"),
        };
        pos += 1;
        let value_start = pos;

        let value_len = memchr::memchr(quote, &input[value_start..])
            .ok_or("attribute value has mismatched quotes")?;
        let raw = &input[value_start..value_start + value_len];
        if memchr::memchr(b'<', raw).is_some() {
            return Err("attribute value cannot contain '<'");
        }

        attrs.push(Attribute::new(name, decode_text(raw)?));
        pos = value_start + value_len + 1;
    }

    Ok(attrs)
}
