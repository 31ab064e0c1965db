//! Tree projection
//!
//! Walks a parsed document through [`DocumentAccess`] and emits the
//! [`SemanticNode`] tree. Only element, text, and CDATA nodes survive:
//! whitespace-only text, comments, and processing instructions project to
//! `None` and are dropped from their parent's children.

use crate::dom::{DocumentAccess, NodeId, NodeKind};
use crate::tree::SemanticNode;
use std::collections::BTreeMap;

/// How element names are written to `tagName`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagCase {
    /// ASCII-lowercase every name (`foreignObject` becomes `foreignobject`)
    #[default]
    Lower,
    /// Keep names as written
    Preserve,
}

/// Projection options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    pub tag_case: TagCase,
}

/// Project `id` and its descendants
pub fn project<D: DocumentAccess>(doc: &D, id: NodeId, options: &ProjectOptions) -> Option<SemanticNode> {
    match doc.node_kind(id)? {
        NodeKind::Element => {
            let name = doc.node_name(id)?;
            let tag_name = match options.tag_case {
                TagCase::Lower => name.to_ascii_lowercase(),
                TagCase::Preserve => name.to_string(),
            };

            // Insertion in document order makes a repeated name last-wins
            let mut attributes = BTreeMap::new();
            for (attr_name, value) in doc.get_attribute_values(id) {
                attributes.insert(attr_name.to_string(), value.to_string());
            }

            let children = doc
                .children_vec(id)
                .into_iter()
                .filter_map(|child| project(doc, child, options))
                .collect();

            Some(SemanticNode::element(tag_name, attributes, children))
        }
        NodeKind::Text => {
            let content = doc.text_content(id)?.trim();
            if content.is_empty() {
                None
            } else {
                Some(SemanticNode::text(content))
            }
        }
        NodeKind::CData => doc.text_content(id).map(SemanticNode::cdata),
        NodeKind::Comment | NodeKind::ProcessingInstruction | NodeKind::Document => None,
    }
}

/// Project starting at the document's root element
pub fn project_document<D: DocumentAccess>(doc: &D, options: &ProjectOptions) -> Option<SemanticNode> {
    project(doc, doc.root_element_id()?, options)
}
