//! Error types for normalization, parsing, and the I/O boundary

use std::fmt;
use std::io;
use thiserror::Error;

/// Well-formedness failure reported by the XML parser
///
/// Displays as `line:column: message`, both 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the parsed markup
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// Create an error at `offset` within `input`, resolving line and column
    pub fn new(message: impl Into<String>, input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |i| i + 1);
        // Column counts characters, not bytes
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;

        ParseError {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Errors surfaced by the conversion pipeline
#[derive(Error, Debug)]
pub enum SvgError {
    /// The raw text does not match any recognized SVG shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The normalized markup is not well-formed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// File read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input bytes could not be decoded as text
    #[error("encoding error: {0}")]
    Encoding(String),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SvgError {
    /// Stable snake_case label for this error's category
    pub fn kind(&self) -> &'static str {
        match self {
            SvgError::InvalidInput(_) => "invalid_input",
            SvgError::Parse(_) => "parse_error",
            SvgError::Io(_) => "io_error",
            SvgError::Encoding(_) => "encoding_error",
            SvgError::Json(_) => "json_error",
        }
    }
}

/// Result type for SVG operations
pub type Result<T> = std::result::Result<T, SvgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        let input = b"<svg>\n  <g>\n</svg>";
        let err = ParseError::new("mismatched end tag", input, 12);
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 1);

        let err = ParseError::new("unclosed tag: g", input, 8);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.to_string(), "2:3: unclosed tag: g");
    }

    #[test]
    fn test_offset_clamped() {
        let err = ParseError::new("eof", b"<svg>", 99);
        assert_eq!(err.offset, 5);
        assert_eq!(err.column, 6);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(SvgError::InvalidInput("x".into()).kind(), "invalid_input");
        let parse = SvgError::from(ParseError::new("bad", b"", 0));
        assert_eq!(parse.kind(), "parse_error");
        assert!(parse.to_string().starts_with("parse error: 1:1:"));
    }
}
