//! Input normalization
//!
//! Rewrites the shapes SVG content arrives in (complete documents, bare
//! content fragments, documents behind an XML prolog) into one well-formed
//! document rooted at `svg`. Shape tests run in a fixed order and the first
//! match wins:
//!
//! 1. strip comments (and a leading byte-order mark)
//! 2. trim surrounding whitespace
//! 3. full document: `<svg ...>...</svg>` passes through unchanged
//! 4. fragment: a whitelisted content tag is wrapped in an `svg` root
//! 5. prolog: the declaration is stripped and the rest normalized again
//! 6. anything else is rejected

use crate::core::scanner::{is_name_start_char, is_whitespace, Scanner};
use crate::error::{Result, SvgError};
use memchr::memmem;
use std::borrow::Cow;
use tracing::debug;

/// Namespace injected into wrapped fragments and prolog documents
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Bare content tags that are wrapped in a synthetic `svg` root
pub const FRAGMENT_TAGS: [&str; 10] = [
    "circle", "rect", "path", "line", "polyline", "polygon", "text", "g", "use", "style",
];

const NO_SVG_CONTENT: &str = "input contains no recognizable SVG content";

/// Normalization options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Pass through any text shaped like a single element (`<name ...>`)
    /// instead of rejecting it
    pub accept_foreign_roots: bool,
}

/// Input normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Normalizer { options }
    }

    /// Normalize raw text into a single well-formed SVG document
    pub fn normalize(&self, input: &str) -> Result<String> {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        let stripped = strip_comments(input);
        self.normalize_trimmed(stripped.trim())
    }

    fn normalize_trimmed(&self, text: &str) -> Result<String> {
        if is_full_document(text) {
            debug!(len = text.len(), "input is a full svg document");
            return Ok(text.to_string());
        }

        if let Some(tag) = fragment_tag(text) {
            debug!(tag, "wrapping bare fragment in svg root");
            return Ok(format!("<svg xmlns=\"{}\">{}</svg>", SVG_NAMESPACE, text));
        }

        if starts_with_xml_declaration(text) {
            return self.normalize_prolog(text);
        }

        if self.options.accept_foreign_roots && is_single_element_shape(text) {
            debug!("accepting non-svg root unchanged");
            return Ok(text.to_string());
        }

        Err(SvgError::InvalidInput(NO_SVG_CONTENT.to_string()))
    }

    /// Strip the XML declaration (and DOCTYPE), normalize the remainder, and
    /// make sure the result declares a namespace
    fn normalize_prolog(&self, text: &str) -> Result<String> {
        let decl_end = memmem::find(text.as_bytes(), b"?>")
            .ok_or_else(|| SvgError::InvalidInput("unterminated XML declaration".to_string()))?;
        let mut rest = text[decl_end + 2..].trim_start();

        if starts_with_ignore_case(rest, "<!DOCTYPE") {
            let end = doctype_end(rest.as_bytes())
                .ok_or_else(|| SvgError::InvalidInput("unterminated DOCTYPE declaration".to_string()))?;
            rest = rest[end..].trim_start();
        }
        debug!("stripped XML prolog");

        let mut body = self.normalize_trimmed(rest.trim_end())?;
        if memmem::find(body.as_bytes(), b"xmlns=").is_none() {
            if let Some(pos) = memmem::find(body.as_bytes(), b"svg") {
                body.insert_str(pos + 3, &format!(" xmlns=\"{}\"", SVG_NAMESPACE));
            }
        }
        Ok(body)
    }
}

/// Normalize with default options
pub fn normalize(input: &str) -> Result<String> {
    Normalizer::default().normalize(input)
}

/// Remove every terminated `<!-- ... -->`; an unterminated one is kept
fn strip_comments(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(first) = memmem::find(bytes, b"<!--") else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    let mut next = Some(first);

    while let Some(start) = next {
        let Some(close) = memmem::find(&bytes[start + 4..], b"-->") else {
            break;
        };
        out.push_str(&input[pos..start]);
        pos = start + 4 + close + 3;
        next = memmem::find(&bytes[pos..], b"<!--").map(|i| pos + i);
    }

    out.push_str(&input[pos..]);
    Cow::Owned(out)
}

/// `<svg` (any case) followed by whitespace, `>` or `/`, closed by `</svg>`
/// or a self-closing root
fn is_full_document(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 5 || !bytes[..4].eq_ignore_ascii_case(b"<svg") {
        return false;
    }
    if !matches!(bytes[4], b'>' | b'/') && !is_whitespace(bytes[4]) {
        return false;
    }
    ends_with_svg_close(bytes) || is_self_closing_root(bytes)
}

/// The root start tag is `<svg .../>` and nothing follows it
fn is_self_closing_root(bytes: &[u8]) -> bool {
    let mut scanner = Scanner::new(bytes);
    scanner.set_position(4);
    scanner
        .find_tag_end_quoted()
        .is_some_and(|end| end + 1 == bytes.len() && bytes[end - 1] == b'/')
}

/// Ends with `</svg>`, allowing whitespace before the `>`
fn ends_with_svg_close(bytes: &[u8]) -> bool {
    let Some(body) = bytes.strip_suffix(b">") else {
        return false;
    };
    let end = body.iter().rposition(|&b| !is_whitespace(b)).map_or(0, |i| i + 1);
    let body = &body[..end];
    body.len() >= 5 && body[body.len() - 5..].eq_ignore_ascii_case(b"</svg")
}

/// The whitelisted tag the text opens with, if any
fn fragment_tag(text: &str) -> Option<&'static str> {
    let rest = text.strip_prefix('<')?;
    FRAGMENT_TAGS.iter().copied().find(|tag| {
        rest.strip_prefix(tag)
            .and_then(|after| after.bytes().next())
            .is_some_and(|b| b == b'/' || b == b'>' || is_whitespace(b))
    })
}

fn starts_with_xml_declaration(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.starts_with(b"<?xml") && bytes.get(5).is_some_and(|&b| b == b'?' || is_whitespace(b))
}

fn is_single_element_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 2 && bytes[0] == b'<' && is_name_start_char(bytes[1]) && bytes.ends_with(b">")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len() && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Byte index just past the DOCTYPE's closing `>`
///
/// Skips over quoted literals and a bracketed internal subset.
fn doctype_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(input: &str) -> bool {
        matches!(normalize(input), Err(SvgError::InvalidInput(_)))
    }

    #[test]
    fn test_full_document_unchanged() {
        let doc = "<svg width=\"10\"><rect/></svg>";
        assert_eq!(normalize(doc).unwrap(), doc);
        assert_eq!(normalize(&normalize(doc).unwrap()).unwrap(), doc);
        assert_eq!(normalize("  \n<svg><g/></svg>\n ").unwrap(), "<svg><g/></svg>");
    }

    #[test]
    fn test_namespaced_document_only_loses_comments() {
        let input = "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\">\
                     <!-- icon body --><path d=\"M0 0h24\"/></svg>";
        let expected = "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"><path d=\"M0 0h24\"/></svg>";
        assert_eq!(normalize(input).unwrap(), expected);
        assert_eq!(normalize(expected).unwrap(), expected);
    }

    #[test]
    fn test_full_document_variants() {
        assert_eq!(normalize("<SVG></SVG >").unwrap(), "<SVG></SVG >");
        assert_eq!(normalize("<svg/>").unwrap(), "<svg/>");
        assert_eq!(normalize("<svg\nviewBox=\"0 0 1 1\"></svg>").unwrap(), "<svg\nviewBox=\"0 0 1 1\"></svg>");
        assert_eq!(normalize("<svg title=\"a/>b\" />").unwrap(), "<svg title=\"a/>b\" />");
        // `<svgfoo>` is not an svg root
        assert!(invalid("<svgfoo></svg>"));
        // only the root tag itself may self-close
        assert!(invalid("<svg><rect/>"));
        assert!(invalid("<svg width=\"1\"><g/><path/>"));
    }

    #[test]
    fn test_fragment_wrapping() {
        for tag in FRAGMENT_TAGS {
            let input = format!("<{} />", tag);
            let expected = format!("<svg xmlns=\"{}\"><{} /></svg>", SVG_NAMESPACE, tag);
            assert_eq!(normalize(&input).unwrap(), expected);
        }
        assert_eq!(
            normalize("<circle r=\"50\"/><rect/>").unwrap(),
            format!("<svg xmlns=\"{}\"><circle r=\"50\"/><rect/></svg>", SVG_NAMESPACE)
        );
    }

    #[test]
    fn test_fragment_match_is_exact() {
        // case-sensitive, and the tag name must end at the whitelist entry
        assert!(invalid("<Circle r=\"1\"/>"));
        assert!(invalid("<glyph/>"));
        assert!(invalid("<g"));
    }

    #[test]
    fn test_rejection() {
        assert!(invalid(""));
        assert!(invalid("   "));
        assert!(invalid("<notsvg><circle r=\"50\"/></notsvg>"));
        assert!(invalid("plain text"));
        assert!(invalid("<!-- only a comment -->"));
    }

    #[test]
    fn test_comments_stripped() {
        assert_eq!(
            normalize("<!-- head --><svg><!-- c --><circle r=\"50\"/></svg>").unwrap(),
            "<svg><circle r=\"50\"/></svg>"
        );
        // an unterminated comment is left for the parser
        assert_eq!(normalize("<svg><!-- open</svg>").unwrap(), "<svg><!-- open</svg>");
    }

    #[test]
    fn test_bom_stripped() {
        assert_eq!(normalize("\u{FEFF}<svg></svg>").unwrap(), "<svg></svg>");
    }

    #[test]
    fn test_prolog_injects_namespace() {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"1\"></svg>";
        assert_eq!(
            normalize(input).unwrap(),
            format!("<svg xmlns=\"{}\" width=\"1\"></svg>", SVG_NAMESPACE)
        );
    }

    #[test]
    fn test_prolog_keeps_existing_namespace() {
        let input = "<?xml version=\"1.0\"?><svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";
        assert_eq!(normalize(input).unwrap(), "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>");
    }

    #[test]
    fn test_prolog_with_doctype() {
        let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
                     \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\" [ <!ENTITY e \"x\"> ]>\n<svg></svg>";
        assert_eq!(normalize(input).unwrap(), format!("<svg xmlns=\"{}\"></svg>", SVG_NAMESPACE));
    }

    #[test]
    fn test_prolog_with_fragment() {
        let input = "<?xml version=\"1.0\"?><rect/>";
        assert_eq!(
            normalize(input).unwrap(),
            format!("<svg xmlns=\"{}\"><rect/></svg>", SVG_NAMESPACE)
        );
    }

    #[test]
    fn test_prolog_errors() {
        assert!(invalid("<?xml version=\"1.0\""));
        assert!(invalid("<?xml version=\"1.0\"?>"));
        assert!(invalid("<?xml version=\"1.0\"?><!DOCTYPE svg [ <svg></svg>"));
        // a stylesheet PI is not a declaration
        assert!(invalid("<?xml-stylesheet href=\"a.css\"?><svg></svg>"));
    }

    #[test]
    fn test_accept_foreign_roots() {
        let normalizer = Normalizer::new(NormalizeOptions { accept_foreign_roots: true });
        let input = "<notsvg><circle r=\"50\"/></notsvg>";
        assert_eq!(normalizer.normalize(input).unwrap(), input);
        assert!(normalizer.normalize("   ").is_err());
        assert!(normalizer.normalize("text <b>").is_err());
    }
}
