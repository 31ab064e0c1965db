//! Conversion driver: normalize, parse, project

use crate::error::{Result, SvgError};
use crate::normalize::{NormalizeOptions, Normalizer};
use crate::parser::{StrictParser, XmlParser, SVG_MIME};
use crate::project::{project_document, ProjectOptions};
use crate::tree::{to_json, SemanticNode};
use tracing::debug;

/// Options for every stage of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub normalize: NormalizeOptions,
    pub project: ProjectOptions,
}

/// SVG to [`SemanticNode`] converter
///
/// Holds no mutable state; one converter can serve any number of threads
/// when its parser is `Send + Sync`.
#[derive(Debug, Clone, Default)]
pub struct SvgConverter<P> {
    parser: P,
    normalizer: Normalizer,
    project: ProjectOptions,
}

impl<P: XmlParser> SvgConverter<P> {
    pub fn new(parser: P) -> Self {
        Self::with_options(parser, ConvertOptions::default())
    }

    pub fn with_options(parser: P, options: ConvertOptions) -> Self {
        SvgConverter {
            parser,
            normalizer: Normalizer::new(options.normalize),
            project: options.project,
        }
    }

    /// Convert raw SVG text into its semantic tree
    pub fn convert(&self, input: &str) -> Result<SemanticNode> {
        let markup = self.normalizer.normalize(input)?;
        let doc = self.parser.parse(&markup, SVG_MIME)?;
        let tree = project_document(&doc, &self.project)
            .ok_or_else(|| SvgError::InvalidInput("document has no root element".to_string()))?;
        debug!(root = tree.tag_name(), depth = tree.depth(), "converted svg");
        Ok(tree)
    }

    /// Convert raw SVG text straight to JSON
    pub fn convert_to_json(&self, input: &str, pretty: bool) -> Result<String> {
        to_json(&self.convert(input)?, pretty)
    }
}

/// Convert with the strict parser and default options
pub fn parser_svg(input: &str) -> Result<SemanticNode> {
    SvgConverter::new(StrictParser).convert(input)
}

/// Convert with the strict parser and default options, then serialize
pub fn convert_to_json(input: &str, pretty: bool) -> Result<String> {
    SvgConverter::new(StrictParser).convert_to_json(input, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{FRAGMENT_TAGS, SVG_NAMESPACE};
    use crate::parser::{LenientParser, ParserMode};
    use crate::project::TagCase;
    use std::collections::BTreeMap;

    #[test]
    fn test_full_document() {
        let root = parser_svg("<svg width=\"24\" height=\"24\"><path d=\"M0 0h24\"/></svg>").unwrap();
        assert_eq!(root.tag_name(), "svg");
        assert_eq!(root.attribute("width"), Some("24"));
        assert_eq!(root.children()[0].attribute("d"), Some("M0 0h24"));
    }

    #[test]
    fn test_fragment_wrapping() {
        for tag in FRAGMENT_TAGS {
            let root = parser_svg(&format!("<{} />", tag)).unwrap();
            assert_eq!(root.tag_name(), "svg");
            assert_eq!(root.attribute("xmlns"), Some(SVG_NAMESPACE));
            assert_eq!(root.children().len(), 1);
            assert_eq!(root.children()[0].tag_name(), tag);
        }
    }

    #[test]
    fn test_rejection() {
        for input in ["", "   ", "<notsvg><circle r=\"50\"/></notsvg>"] {
            let err = parser_svg(input).unwrap_err();
            assert!(matches!(err, SvgError::InvalidInput(_)), "{:?} gave {:?}", input, err);
        }
    }

    #[test]
    fn test_whitespace_pruning() {
        let root = parser_svg("<svg>\n  <rect x=\"0\" y=\"0\"/>\n</svg>").unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].tag_name(), "rect");
    }

    #[test]
    fn test_cdata_round_trip() {
        let root = parser_svg("<svg><style><![CDATA[circle{fill:red;}]]></style></svg>").unwrap();
        let style = &root.children()[0];
        assert_eq!(style.tag_name(), "style");
        assert_eq!(style.children(), &[SemanticNode::cdata("circle{fill:red;}")]);
    }

    #[test]
    fn test_comment_exclusion() {
        let root = parser_svg("<svg><!-- c --><circle r=\"50\"/></svg>").unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].tag_name(), "circle");
    }

    #[test]
    fn test_attribute_fidelity() {
        let root =
            parser_svg("<svg><rect x=\"10\" y=\"10\" width=\"100\" height=\"100\" opacity=\"0.5\"/></svg>").unwrap();
        let expected: BTreeMap<String, String> = [
            ("x", "10"),
            ("y", "10"),
            ("width", "100"),
            ("height", "100"),
            ("opacity", "0.5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(
            root.children()[0],
            SemanticNode::element("rect", expected, vec![])
        );
    }

    #[test]
    fn test_entity_decoding() {
        let root = parser_svg("<text>Special &lt; &gt; &amp; chars</text>").unwrap();
        let text = &root.children()[0];
        assert_eq!(text.tag_name(), "text");
        assert_eq!(text.children(), &[SemanticNode::text("Special < > & chars")]);
    }

    #[test]
    fn test_depth() {
        let root = parser_svg("<svg><g><g><g><circle r=\"10\"/></g></g></g></svg>").unwrap();
        assert_eq!(root.depth(), 4);

        let mut node = &root;
        for expected in ["g", "g", "g", "circle"] {
            assert_eq!(node.children().len(), 1);
            node = &node.children()[0];
            assert_eq!(node.tag_name(), expected);
        }
    }

    #[test]
    fn test_unclosed_root_is_invalid_input() {
        let err = parser_svg("<svg><rect/>").unwrap_err();
        assert!(matches!(err, SvgError::InvalidInput(_)), "got {:?}", err);
    }

    #[test]
    fn test_deep_nesting_fails_cleanly() {
        let levels = 200_000;
        let input = format!("<svg>{}{}</svg>", "<g>".repeat(levels), "</g>".repeat(levels));
        match parser_svg(&input).unwrap_err() {
            SvgError::Parse(parse) => assert!(parse.message.starts_with("nesting too deep")),
            other => panic!("expected parse error, got {:?}", other),
        }

        let root = SvgConverter::new(LenientParser).convert(&input).unwrap();
        assert_eq!(root.tag_name(), "parsererror");
    }

    #[test]
    fn test_strict_parse_failure() {
        let err = parser_svg("<svg><g></svg>").unwrap_err();
        assert_eq!(err.kind(), "parse_error");
        match err {
            SvgError::Parse(parse) => {
                assert_eq!(parse.to_string(), "1:9: mismatched end tag: expected </g>, found </svg>");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_parse_failure() {
        let converter = SvgConverter::new(LenientParser);
        let root = converter.convert("<svg><g></svg>").unwrap();
        assert_eq!(root.tag_name(), "parsererror");
        assert_eq!(
            root.children(),
            &[SemanticNode::text("1:9: mismatched end tag: expected </g>, found </svg>")]
        );
    }

    #[test]
    fn test_parser_mode_converter() {
        let strict = SvgConverter::new(ParserMode::Strict);
        let lenient = SvgConverter::new(ParserMode::Lenient);
        assert!(strict.convert("<svg><rect x=1/></svg>").is_err());
        assert_eq!(lenient.convert("<svg><rect x=1/></svg>").unwrap().tag_name(), "parsererror");
    }

    #[test]
    fn test_foreign_object_case() {
        let input = "<svg><foreignObject width=\"10\"/></svg>";
        assert_eq!(parser_svg(input).unwrap().children()[0].tag_name(), "foreignobject");

        let options = ConvertOptions {
            project: ProjectOptions { tag_case: TagCase::Preserve },
            ..ConvertOptions::default()
        };
        let root = SvgConverter::with_options(StrictParser, options).convert(input).unwrap();
        assert_eq!(root.children()[0].tag_name(), "foreignObject");
    }

    #[test]
    fn test_prolog_and_doctype() {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
                     <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\
                     <svg xmlns:xlink=\"http://www.w3.org/1999/xlink\"><use xlink:href=\"#icon\"/></svg>";
        let root = parser_svg(input).unwrap();
        assert_eq!(root.attribute("xmlns"), Some(SVG_NAMESPACE));
        assert_eq!(root.attribute("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
        assert_eq!(root.children()[0].attribute("xlink:href"), Some("#icon"));
    }

    #[test]
    fn test_accept_foreign_roots() {
        let options = ConvertOptions {
            normalize: NormalizeOptions { accept_foreign_roots: true },
            ..ConvertOptions::default()
        };
        let root = SvgConverter::with_options(StrictParser, options)
            .convert("<notsvg><circle r=\"50\"/></notsvg>")
            .unwrap();
        assert_eq!(root.tag_name(), "notsvg");
        assert_eq!(root.children()[0].attribute("r"), Some("50"));
    }

    #[test]
    fn test_convert_to_json() {
        let json = convert_to_json("<svg><rect/><text> hi </text></svg>", false).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"element","tagName":"svg","attributes":{},"children":[{"kind":"element","tagName":"rect","attributes":{}},{"kind":"element","tagName":"text","attributes":{},"children":[{"kind":"text","content":"hi"}]}]}"#
        );
    }
}
