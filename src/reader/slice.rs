//! Zero-Copy Slice Parser
//!
//! Parses XML from a byte slice with zero-copy semantics.
//! Input references are maintained directly in the output.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::scanner::is_whitespace;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::ParseError;

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
    attr_error: Option<ParseError>,
    token_start: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
            attr_error: None,
            token_start: 0,
        }
    }

    /// Get the first parse error (tokenizer or attribute level)
    pub fn error(&self) -> Option<&ParseError> {
        self.attr_error.as_ref().or_else(|| self.tokenizer.error())
    }

    /// Byte offset where the most recently returned event starts
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the next XML event
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        if self.attr_error.is_some() {
            return None;
        }

        let token = self.tokenizer.next_token()?;
        self.token_start = token.span.0;

        match token.kind {
            TokenKind::Eof => Some(XmlEvent::EndDocument),

            TokenKind::StartTag => {
                let attrs = self.parse_tag_attributes(&token)?;
                Some(XmlEvent::StartElement(StartElement::new(token.name?, attrs)))
            }

            TokenKind::EmptyTag => {
                let attrs = self.parse_tag_attributes(&token)?;
                Some(XmlEvent::EmptyElement(StartElement::new(token.name?, attrs)))
            }

            TokenKind::EndTag => Some(XmlEvent::EndElement(EndElement::new(token.name?))),

            TokenKind::Text => Some(XmlEvent::Text(token.content?)),

            TokenKind::CData => Some(XmlEvent::CData(token.content?)),

            TokenKind::Comment => Some(XmlEvent::Comment(token.content?)),

            TokenKind::ProcessingInstruction => Some(XmlEvent::ProcessingInstruction {
                target: token.name?,
                data: token.content.filter(|d| !d.is_empty()),
            }),

            TokenKind::XmlDeclaration => Some(XmlEvent::XmlDeclaration),

            TokenKind::DocType => Some(XmlEvent::DocType),
        }
    }

    /// Parse attributes from a tag token
    ///
    /// The attribute list sits between the element name and the closing
    /// '>' or '/>' of the token's span.
    fn parse_tag_attributes(&mut self, token: &Token<'a>) -> Option<Vec<Attribute<'a>>> {
        let (start, end) = token.span;
        let name_len = token.name.as_ref().map_or(0, |n| n.len());
        let attr_start = start + 1 + name_len;
        let mut attr_end = end - 1;
        if token.kind == TokenKind::EmptyTag {
            attr_end -= 1;
        }

        if attr_start >= attr_end {
            return Some(Vec::new());
        }

        let attr_content = &self.input[attr_start..attr_end];
        if attr_content.iter().all(|&b| is_whitespace(b)) {
            return Some(Vec::new());
        }

        match parse_attributes(attr_content) {
            Ok(attrs) => Some(attrs),
            Err(msg) => {
                self.attr_error = Some(ParseError::new(msg, self.input, start));
                None
            }
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event()? {
            XmlEvent::EndDocument => None,
            event => Some(event),
        }
    }
}
