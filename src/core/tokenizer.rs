//! XML Tokenizer - State machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end/empty tags
//! - Text content (entities decoded)
//! - CDATA sections (raw)
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (skipped over, internal subset included)
//!
//! Lexical well-formedness errors stop the tokenizer; the first one is kept
//! and exposed through [`Tokenizer::error`].

use super::entities::decode_text;
use super::scanner::{is_whitespace, Scanner};
use crate::error::ParseError;
use std::borrow::Cow;

/// Current parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Between tokens
    Ready,
    /// End of input reached or an error stopped the tokenizer
    Done,
}

/// Type of XML token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// XML declaration: <?xml ...?>
    XmlDeclaration,
    /// DOCTYPE declaration
    DocType,
    /// End of file
    Eof,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags and PIs: the name / target
    pub name: Option<Cow<'a, [u8]>>,
    /// For text/cdata/comments/PIs: the content (owned if entities were decoded)
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(Cow::Borrowed(name));
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    state: ParseState,
    error: Option<ParseError>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            state: ParseState::Ready,
            error: None,
        }
    }

    /// Get the first lexical error, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Record an error at `position` and stop tokenizing
    fn fail(&mut self, message: impl Into<String>, position: usize) -> Option<Token<'a>> {
        if self.error.is_none() {
            self.error = Some(ParseError::new(message, self.scanner.input(), position));
        }
        self.state = ParseState::Done;
        None
    }

    /// Get the next token, or None once input is exhausted or an error occurred
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.state == ParseState::Done {
            return None;
        }

        if self.scanner.is_eof() {
            self.state = ParseState::Done;
            let end = self.scanner.position();
            return Some(Token::new(TokenKind::Eof, (end, end)));
        }

        if self.scanner.peek() == Some(b'<') {
            self.parse_markup()
        } else {
            self.parse_text()
        }
    }

    /// Parse a text run up to the next '<' (or end of input)
    fn parse_text(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start().unwrap_or(self.scanner.input().len());
        let raw = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        match decode_text(raw) {
            Ok(content) => Some(Token::new(TokenKind::Text, (start, end)).with_content(content)),
            Err(msg) => self.fail(msg, start),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        self.scanner.advance(1);

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => self.fail("unexpected end of input after '<'", start),
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => return self.fail("invalid element name", start),
        };

        match self.scanner.peek() {
            Some(b) if is_whitespace(b) || b == b'/' || b == b'>' => {}
            Some(_) => return self.fail("invalid element name", start),
            None => {
                let tag = String::from_utf8_lossy(name).into_owned();
                return self.fail(format!("unterminated start tag: {}", tag), start);
            }
        }

        let end = match self.scanner.find_tag_end_quoted() {
            Some(end) => end,
            None => {
                let tag = String::from_utf8_lossy(name).into_owned();
                return self.fail(format!("unterminated start tag: {}", tag), start);
            }
        };
        self.scanner.set_position(end + 1);

        let kind = if self.scanner.slice(start, end).ends_with(b"/") {
            TokenKind::EmptyTag
        } else {
            TokenKind::StartTag
        };

        Some(Token::new(kind, (start, end + 1)).with_name(name))
    }

    /// Parse an end tag: </name>
    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '/'
        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => return self.fail("invalid end tag name", start),
        };
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return self.fail("malformed end tag", start);
        }
        self.scanner.advance(1);

        Some(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
    }

    /// Parse comment, CDATA, or DOCTYPE
    fn parse_bang_markup(&mut self, start: usize) -> Option<Token<'a>> {
        if self.scanner.starts_with(b"!--") {
            self.scanner.advance(3);
            return self.read_delimited(start, b"-->", TokenKind::Comment, "unclosed comment");
        }

        if self.scanner.starts_with(b"![CDATA[") {
            self.scanner.advance(8);
            return self.read_delimited(start, b"]]>", TokenKind::CData, "unclosed CDATA section");
        }

        if self.scanner.starts_with(b"!DOCTYPE") {
            return self.parse_doctype(start);
        }

        self.fail("unexpected markup declaration", start)
    }

    /// Read raw content up to `terminator`, producing a token of `kind`
    fn read_delimited(
        &mut self,
        start: usize,
        terminator: &[u8],
        kind: TokenKind,
        unclosed: &str,
    ) -> Option<Token<'a>> {
        let content_start = self.scanner.position();
        let content_end = match self.scanner.find_seq(terminator) {
            Some(end) => end,
            None => return self.fail(unclosed, start),
        };
        self.scanner.set_position(content_end + terminator.len());

        let content = self.scanner.slice(content_start, content_end);
        Some(Token::new(kind, (start, self.scanner.position())).with_content(Cow::Borrowed(content)))
    }

    /// Skip over a DOCTYPE declaration, including a bracketed internal subset
    fn parse_doctype(&mut self, start: usize) -> Option<Token<'a>> {
        let input = self.scanner.input();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut pos = self.scanner.position();

        while pos < input.len() {
            match (quote, input[pos]) {
                (Some(q), b) if b == q => quote = None,
                (Some(_), _) => {}
                (None, q @ (b'"' | b'\'')) => quote = Some(q),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => {
                    self.scanner.set_position(pos + 1);
                    return Some(Token::new(TokenKind::DocType, (start, pos + 1)));
                }
                _ => {}
            }
            pos += 1;
        }

        self.fail("unclosed DOCTYPE declaration", start)
    }

    /// Parse a processing instruction or XML declaration
    fn parse_pi(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '?'
        let target = match self.scanner.read_name() {
            Some(target) => target,
            None => return self.fail("invalid processing instruction target", start),
        };

        let data_start = self.scanner.position();
        let data_end = match self.scanner.find_seq(b"?>") {
            Some(end) => end,
            None => return self.fail("unclosed processing instruction", start),
        };
        self.scanner.set_position(data_end + 2);

        let kind = if target == b"xml" {
            TokenKind::XmlDeclaration
        } else if target.eq_ignore_ascii_case(b"xml") {
            return self.fail("reserved processing instruction target", start);
        } else {
            TokenKind::ProcessingInstruction
        };

        let data = self.scanner.slice(data_start, data_end);
        let data = &data[data.iter().take_while(|&&b| is_whitespace(b)).count()..];

        Some(
            Token::new(kind, (start, self.scanner.position()))
                .with_name(target)
                .with_content(Cow::Borrowed(data)),
        )
    }
}
