//! Semantic tree produced by projection
//!
//! A [`SemanticNode`] is plain owned data. It serializes as an internally
//! tagged JSON object keyed by `kind`:
//!
//! ```json
//! {"kind":"element","tagName":"svg","attributes":{},"children":[
//!   {"kind":"text","content":"Logo"}
//! ]}
//! ```
//!
//! `attributes` is always present on elements; `children` is omitted when
//! empty and defaults to an empty list when read back.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel tag name reported for text nodes
pub const TEXT_TAG: &str = "#text";
/// Sentinel tag name reported for CDATA nodes
pub const CDATA_TAG: &str = "#cdata-section";

/// A node of the normalized output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SemanticNode {
    /// An element with its attributes and significant children
    Element {
        #[serde(rename = "tagName")]
        tag_name: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        children: Vec<SemanticNode>,
    },
    /// Trimmed, entity-decoded character data; never empty
    Text { content: String },
    /// Raw CDATA payload
    Cdata { content: String },
}

impl SemanticNode {
    /// Create an element node
    pub fn element(
        tag_name: impl Into<String>,
        attributes: BTreeMap<String, String>,
        children: Vec<SemanticNode>,
    ) -> Self {
        SemanticNode::Element {
            tag_name: tag_name.into(),
            attributes,
            children,
        }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        SemanticNode::Text { content: content.into() }
    }

    /// Create a CDATA node
    pub fn cdata(content: impl Into<String>) -> Self {
        SemanticNode::Cdata { content: content.into() }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, SemanticNode::Element { .. })
    }

    /// Tag name, or `#text` / `#cdata-section` for character data
    pub fn tag_name(&self) -> &str {
        match self {
            SemanticNode::Element { tag_name, .. } => tag_name,
            SemanticNode::Text { .. } => TEXT_TAG,
            SemanticNode::Cdata { .. } => CDATA_TAG,
        }
    }

    /// Children in document order (empty for character data)
    pub fn children(&self) -> &[SemanticNode] {
        match self {
            SemanticNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Look up an attribute value by its full (possibly prefixed) name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            SemanticNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Character content of a text or CDATA node
    pub fn content(&self) -> Option<&str> {
        match self {
            SemanticNode::Text { content } | SemanticNode::Cdata { content } => Some(content),
            SemanticNode::Element { .. } => None,
        }
    }

    /// Length of the longest chain of element descendants below this node
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .filter(|child| child.is_element())
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Serialize a tree to JSON
pub fn to_json(node: &SemanticNode, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(node)?
    } else {
        serde_json::to_string(node)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_sentinel_tag_names() {
        assert_eq!(SemanticNode::text("a").tag_name(), "#text");
        assert_eq!(SemanticNode::cdata("a").tag_name(), "#cdata-section");
        assert_eq!(SemanticNode::element("g", BTreeMap::new(), vec![]).tag_name(), "g");
    }

    #[test]
    fn test_json_field_presence() {
        let leaf = SemanticNode::element("rect", BTreeMap::new(), vec![]);
        assert_eq!(
            to_json(&leaf, false).unwrap(),
            r#"{"kind":"element","tagName":"rect","attributes":{}}"#
        );

        let root = SemanticNode::element("svg", attrs(&[("width", "10")]), vec![SemanticNode::text("hi")]);
        assert_eq!(
            to_json(&root, false).unwrap(),
            r#"{"kind":"element","tagName":"svg","attributes":{"width":"10"},"children":[{"kind":"text","content":"hi"}]}"#
        );
    }

    #[test]
    fn test_deserialize_missing_children() {
        let node: SemanticNode =
            serde_json::from_str(r#"{"kind":"element","tagName":"g","attributes":{"id":"a"}}"#).unwrap();
        assert!(node.children().is_empty());
        assert_eq!(node.attribute("id"), Some("a"));

        let cdata: SemanticNode = serde_json::from_str(r#"{"kind":"cdata","content":" x "}"#).unwrap();
        assert_eq!(cdata.content(), Some(" x "));
    }

    #[test]
    fn test_depth() {
        let circle = SemanticNode::element("circle", BTreeMap::new(), vec![]);
        let g = SemanticNode::element("g", BTreeMap::new(), vec![SemanticNode::text("t"), circle]);
        let svg = SemanticNode::element("svg", BTreeMap::new(), vec![g]);
        assert_eq!(svg.depth(), 2);
        assert_eq!(SemanticNode::text("t").depth(), 0);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let node = SemanticNode::element("svg", BTreeMap::new(), vec![]);
        assert!(to_json(&node, true).unwrap().contains('\n'));
    }
}
