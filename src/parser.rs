//! XML parser capability
//!
//! The converter reaches its XML engine only through [`XmlParser`], so the
//! engine and its error policy are chosen once, when the converter is built.
//! Two policies ship with the crate:
//!
//! - [`StrictParser`] returns the first well-formedness error as `Err`.
//! - [`LenientParser`] never fails on malformed markup. It returns a
//!   document rooted at `parsererror` that carries the error text.

use crate::dom::{DocumentAccess, XmlDocument};
use crate::error::ParseError;
use tracing::debug;

/// MIME type the converter passes to the parser
pub const SVG_MIME: &str = "image/svg+xml";

/// MIME types accepted by the built-in parsers
pub const XML_MIME_TYPES: [&str; 3] = [SVG_MIME, "application/xml", "text/xml"];

/// An XML engine producing a document the projector can walk
pub trait XmlParser: Send + Sync {
    type Document: DocumentAccess;

    /// Parse `markup`, interpreted as `mime_type`
    fn parse(&self, markup: &str, mime_type: &str) -> Result<Self::Document, ParseError>;
}

/// Reports malformed markup as `Err`
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictParser;

/// Reports malformed markup as a `parsererror` document
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientParser;

/// Runtime choice between the built-in parsers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserMode {
    #[default]
    Strict,
    Lenient,
}

fn check_mime_type(mime_type: &str) -> Result<(), ParseError> {
    if XML_MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(mime_type)) {
        Ok(())
    } else {
        Err(ParseError::new(format!("unsupported MIME type: {}", mime_type), b"", 0))
    }
}

impl XmlParser for StrictParser {
    type Document = XmlDocument;

    fn parse(&self, markup: &str, mime_type: &str) -> Result<XmlDocument, ParseError> {
        check_mime_type(mime_type)?;
        let doc = XmlDocument::parse(markup.as_bytes())?;
        debug!(nodes = doc.node_count(), strings = doc.strings.len(), "parsed document");
        Ok(doc)
    }
}

impl XmlParser for LenientParser {
    type Document = XmlDocument;

    fn parse(&self, markup: &str, mime_type: &str) -> Result<XmlDocument, ParseError> {
        check_mime_type(mime_type)?;
        match XmlDocument::parse(markup.as_bytes()) {
            Ok(doc) => Ok(doc),
            Err(err) => {
                debug!(error = %err, "markup not well-formed, returning parsererror document");
                Ok(XmlDocument::parser_error(&err))
            }
        }
    }
}

impl XmlParser for ParserMode {
    type Document = XmlDocument;

    fn parse(&self, markup: &str, mime_type: &str) -> Result<XmlDocument, ParseError> {
        match self {
            ParserMode::Strict => StrictParser.parse(markup, mime_type),
            ParserMode::Lenient => LenientParser.parse(markup, mime_type),
        }
    }
}
