//! Elixir Term Conversion Utilities
//!
//! Converts semantic trees and conversion errors to Elixir terms.

use crate::error::SvgError;
use crate::tree::SemanticNode;
use rustler::{Atom, Encoder, Env, NewBinary, NifResult, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    kind,
    element,
    text,
    cdata,
    tag_name,
    attributes,
    children,
    content,
    invalid_input,
    parse_error,
    io_error,
    encoding_error,
    json_error,
}

/// Convert a tree to nested maps
///
/// Elements become `%{kind: :element, tag_name: name, attributes: %{}, children: [...]}`
/// and character data `%{kind: :text | :cdata, content: binary}`.
pub fn node_to_term<'a>(env: Env<'a>, node: &SemanticNode) -> NifResult<Term<'a>> {
    match node {
        SemanticNode::Element {
            tag_name: name,
            attributes: attrs,
            children: kids,
        } => {
            let attr_pairs: Vec<(Term<'a>, Term<'a>)> = attrs
                .iter()
                .map(|(k, v)| (str_to_binary(env, k), str_to_binary(env, v)))
                .collect();
            let attr_map = Term::map_from_pairs(env, &attr_pairs)?;

            // Build in reverse so each prepend is O(1)
            let mut list = Term::list_new_empty(env);
            for child in kids.iter().rev() {
                list = list.list_prepend(node_to_term(env, child)?);
            }

            Term::map_from_pairs(
                env,
                &[
                    (kind().encode(env), element().encode(env)),
                    (tag_name().encode(env), str_to_binary(env, name)),
                    (attributes().encode(env), attr_map),
                    (children().encode(env), list),
                ],
            )
        }
        SemanticNode::Text { content: body } => character_data(env, text(), body),
        SemanticNode::Cdata { content: body } => character_data(env, cdata(), body),
    }
}

fn character_data<'a>(env: Env<'a>, node_kind: Atom, body: &str) -> NifResult<Term<'a>> {
    Term::map_from_pairs(
        env,
        &[
            (kind().encode(env), node_kind.encode(env)),
            (content().encode(env), str_to_binary(env, body)),
        ],
    )
}

/// Atom naming an error's category
pub fn error_kind(err: &SvgError) -> Atom {
    match err {
        SvgError::InvalidInput(_) => invalid_input(),
        SvgError::Parse(_) => parse_error(),
        SvgError::Io(_) => io_error(),
        SvgError::Encoding(_) => encoding_error(),
        SvgError::Json(_) => json_error(),
    }
}

/// `{:ok, value}`
pub fn ok_term<'a>(env: Env<'a>, value: Term<'a>) -> Term<'a> {
    (ok(), value).encode(env)
}

/// `{:error, {kind, message}}`
pub fn error_term<'a>(env: Env<'a>, err: &SvgError) -> Term<'a> {
    let message = match err {
        SvgError::InvalidInput(msg) | SvgError::Encoding(msg) => msg.clone(),
        SvgError::Parse(parse) => parse.to_string(),
        other => other.to_string(),
    };
    (error(), (error_kind(err), str_to_binary(env, &message))).encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
