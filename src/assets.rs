//! SVG asset files

use crate::core::encoding::decode_to_string;
use crate::error::{Result, SvgError};
use std::fs;
use std::path::Path;

/// Read an SVG file as text
///
/// Handles a UTF-8 BOM and UTF-16 input. With `collapse` set, every run of
/// whitespace is replaced by one space (see [`collapse_whitespace`]).
pub fn read_svg_file(path: impl AsRef<Path>, collapse: bool) -> Result<String> {
    let bytes = fs::read(path.as_ref())?;
    let text = decode_to_string(bytes).map_err(SvgError::Encoding)?;
    Ok(if collapse { collapse_whitespace(&text) } else { text })
}

/// Replace each run of whitespace with a single space
///
/// Applies inside text and CDATA too, so only use it on assets whose
/// character data does not depend on layout.
pub fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}
