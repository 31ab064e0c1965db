//! RustySVG - SVG to semantic JSON trees
//!
//! Pipeline:
//! 1. Normalize: documents, bare fragments, and prolog documents become one
//!    well-formed `svg` document ([`normalize`])
//! 2. Parse: an [`XmlParser`] builds an arena DOM ([`dom::XmlDocument`])
//! 3. Project: the DOM becomes a [`SemanticNode`] tree ([`project`])
//!
//! ```
//! let root = rustysvg::parser_svg("<circle r=\"50\"/>").unwrap();
//! assert_eq!(root.tag_name(), "svg");
//! assert_eq!(root.children()[0].attribute("r"), Some("50"));
//! ```
//!
//! With the `nif` feature the crate also loads as `Elixir.RustySVG.Native`.

pub mod assets;
pub mod batch;
pub mod convert;
pub mod core;
pub mod dom;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod project;
pub mod reader;
pub mod tree;

#[cfg(feature = "nif")]
mod term;

pub use convert::{convert_to_json, parser_svg, ConvertOptions, SvgConverter};
pub use error::{ParseError, Result, SvgError};
pub use normalize::{normalize, NormalizeOptions, Normalizer};
pub use parser::{LenientParser, ParserMode, StrictParser, XmlParser, SVG_MIME};
pub use project::{project, project_document, ProjectOptions, TagCase};
pub use tree::{to_json, SemanticNode};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// NIF Interface
// ============================================================================

#[cfg(feature = "nif")]
mod nif {
    use crate::convert::SvgConverter;
    use crate::core::encoding::decode_to_string;
    use crate::error::SvgError;
    use crate::parser::{LenientParser, StrictParser, XmlParser};
    use crate::term::{error_term, node_to_term, ok_term, str_to_binary};
    use rustler::{Binary, Env, NifResult, Term};

    fn input_text(input: &Binary) -> Result<String, SvgError> {
        decode_to_string(input.as_slice().to_vec()).map_err(SvgError::Encoding)
    }

    fn convert_term<'a, P: XmlParser>(
        env: Env<'a>,
        converter: &SvgConverter<P>,
        input: &Binary<'a>,
    ) -> NifResult<Term<'a>> {
        match input_text(input).and_then(|svg| converter.convert(&svg)) {
            Ok(tree) => Ok(ok_term(env, node_to_term(env, &tree)?)),
            Err(err) => Ok(error_term(env, &err)),
        }
    }

    /// Convert SVG markup, returning `{:ok, tree}` or `{:error, {kind, message}}`
    #[rustler::nif(schedule = "DirtyCpu")]
    fn parse_svg<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
        convert_term(env, &SvgConverter::new(StrictParser), &input)
    }

    /// Like `parse_svg`, but malformed markup yields a `parsererror` tree
    #[rustler::nif(schedule = "DirtyCpu")]
    fn parse_svg_lenient<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
        convert_term(env, &SvgConverter::new(LenientParser), &input)
    }

    #[rustler::nif]
    fn normalize<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
        match input_text(&input).and_then(|svg| crate::normalize::normalize(&svg)) {
            Ok(markup) => Ok(ok_term(env, str_to_binary(env, &markup))),
            Err(err) => Ok(error_term(env, &err)),
        }
    }

    #[rustler::nif(schedule = "DirtyCpu")]
    fn to_json<'a>(env: Env<'a>, input: Binary<'a>, pretty: bool) -> NifResult<Term<'a>> {
        let converter = SvgConverter::new(StrictParser);
        match input_text(&input).and_then(|svg| converter.convert_to_json(&svg, pretty)) {
            Ok(json) => Ok(ok_term(env, str_to_binary(env, &json))),
            Err(err) => Ok(error_term(env, &err)),
        }
    }

    rustler::init!("Elixir.RustySVG.Native");
}
