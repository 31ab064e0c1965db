//! XML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and character data
//!
//! Parsing is strict: the first well-formedness violation aborts the build
//! and is returned as a [`ParseError`]. [`XmlDocument::parser_error`] builds
//! the error-marker document that lenient callers project instead.

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use super::DocumentAccess;
use crate::error::ParseError;
use crate::reader::events::{StartElement, XmlEvent};
use crate::reader::slice::SliceReader;

/// Tag name of the root element synthesized for an unparsable document
pub const PARSER_ERROR_TAG: &str = "parsererror";

/// Deepest element nesting accepted by [`XmlDocument::parse`]
///
/// Projection and serialization recurse once per level, so the limit keeps
/// them within a small native stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// An XML document stored in arena format
#[derive(Debug)]
pub struct XmlDocument {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings
    pub strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

/// Per-parse bookkeeping for document-level structure checks
struct BuildState {
    /// Open nodes, starting with the document node
    stack: Vec<NodeId>,
    /// Open tag names with the offset of their '<'
    tag_stack: Vec<(Vec<u8>, usize)>,
    seen_root: bool,
    seen_doctype: bool,
}

impl XmlDocument {
    fn empty() -> Self {
        XmlDocument {
            nodes: vec![XmlNode::document()],
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
            root_element: None,
        }
    }

    /// Parse an XML document
    /// Returns Err if the document is not well-formed
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        let mut doc = Self::empty();
        doc.nodes.reserve(256);
        doc.build_from_events(input)?;
        Ok(doc)
    }

    /// Build the error-marker document for a failed parse
    ///
    /// The root is a `parsererror` element holding one text child with the
    /// error rendered as `line:column: message`.
    pub fn parser_error(error: &ParseError) -> Self {
        let mut doc = Self::empty();

        let name_id = doc.strings.intern(PARSER_ERROR_TAG.as_bytes());
        let root_id = doc.push_node(XmlNode::element(name_id, Some(0), 1));
        doc.root_element = Some(root_id);

        let content_id = doc.strings.intern(error.to_string().as_bytes());
        doc.push_node(XmlNode::character_data(NodeKind::Text, content_id, Some(root_id), 2));

        doc
    }

    /// Build DOM from XML events
    fn build_from_events(&mut self, input: &[u8]) -> Result<(), ParseError> {
        let mut reader = SliceReader::new(input);
        let mut state = BuildState {
            stack: vec![0],
            tag_stack: Vec::new(),
            seen_root: false,
            seen_doctype: false,
        };

        while let Some(event) = reader.next_event() {
            let at = reader.token_start();
            let at_document_level = state.stack.len() == 1;
            let fail = |message: String| ParseError::new(message, input, at);

            match event {
                XmlEvent::StartElement(elem) | XmlEvent::EmptyElement(elem)
                    if at_document_level && state.seen_root =>
                {
                    let name = String::from_utf8_lossy(elem.name.as_ref()).into_owned();
                    return Err(fail(format!("multiple root elements: {}", name)));
                }

                XmlEvent::StartElement(elem) => {
                    state.tag_stack.push((elem.name.to_vec(), at));
                    let node_id = self.handle_element(elem, &state).map_err(fail)?;
                    state.stack.push(node_id);
                    state.seen_root = true;
                }

                XmlEvent::EmptyElement(elem) => {
                    self.handle_element(elem, &state).map_err(fail)?;
                    state.seen_root = true;
                }

                XmlEvent::EndElement(end_elem) => {
                    let end_name = String::from_utf8_lossy(end_elem.name.as_ref()).into_owned();
                    match state.tag_stack.pop() {
                        Some((start_name, _)) if start_name == end_elem.name.as_ref() => {}
                        Some((start_name, _)) => {
                            let start_name = String::from_utf8_lossy(&start_name);
                            return Err(fail(format!(
                                "mismatched end tag: expected </{}>, found </{}>",
                                start_name, end_name
                            )));
                        }
                        None => return Err(fail(format!("unexpected end tag: </{}>", end_name))),
                    }
                    state.stack.pop();
                }

                XmlEvent::Text(content) => {
                    if at_document_level {
                        if !content.iter().all(|b| b.is_ascii_whitespace()) {
                            return Err(fail("text content not allowed outside the root element".to_string()));
                        }
                        continue;
                    }
                    self.append_character_data(NodeKind::Text, &content, &state.stack);
                }

                XmlEvent::CData(content) => {
                    if at_document_level {
                        return Err(fail("CDATA section not allowed outside the root element".to_string()));
                    }
                    self.append_character_data(NodeKind::CData, &content, &state.stack);
                }

                XmlEvent::Comment(content) => {
                    self.append_character_data(NodeKind::Comment, &content, &state.stack);
                }

                XmlEvent::ProcessingInstruction { target, .. } => {
                    let parent_id = *state.stack.last().unwrap_or(&0);
                    let target_id = self.strings.intern(target.as_ref());
                    let depth = depth_of(&state.stack);
                    self.push_node(XmlNode::processing_instruction(target_id, Some(parent_id), depth));
                }

                XmlEvent::XmlDeclaration => {
                    if at != 0 {
                        return Err(fail("XML declaration allowed only at the start of the document".to_string()));
                    }
                }

                XmlEvent::DocType => {
                    if state.seen_root || !at_document_level {
                        return Err(fail("DOCTYPE must come before the root element".to_string()));
                    }
                    if state.seen_doctype {
                        return Err(fail("multiple DOCTYPE declarations".to_string()));
                    }
                    state.seen_doctype = true;
                }

                XmlEvent::EndDocument => break,
            }
        }

        if let Some(err) = reader.error() {
            return Err(err.clone());
        }

        // Report the innermost unclosed tag, which is where the parse gave up
        if let Some((name, at)) = state.tag_stack.last() {
            let name = String::from_utf8_lossy(name);
            return Err(ParseError::new(format!("unclosed tag: {}", name), input, *at));
        }

        if self.root_element.is_none() {
            return Err(ParseError::new("no root element", input, input.len()));
        }

        Ok(())
    }

    /// Handle start/empty element, returning the new node's ID
    fn handle_element(&mut self, elem: StartElement<'_>, state: &BuildState) -> Result<NodeId, String> {
        if let Some(dup) = find_duplicate_attribute(&elem) {
            return Err(format!("duplicate attribute: {}", dup));
        }

        let parent_id = *state.stack.last().unwrap_or(&0);
        let name_id = self.strings.intern(elem.name.as_ref());
        let mut node = XmlNode::element(name_id, Some(parent_id), depth_of(&state.stack));
        if node.depth as usize > MAX_NESTING_DEPTH {
            return Err(format!("nesting too deep: more than {} levels", MAX_NESTING_DEPTH));
        }

        node.attr_start = self.attributes.len() as u32;
        node.attr_count = elem.attributes.len() as u32;
        for attr in &elem.attributes {
            let attr_name_id = self.strings.intern(attr.name.as_ref());
            let attr_value_id = self.strings.intern(attr.value.as_ref());
            self.attributes.push(XmlAttribute::new(attr_name_id, attr_value_id));
        }

        let node_id = self.push_node(node);
        if self.root_element.is_none() && parent_id == 0 {
            self.root_element = Some(node_id);
        }

        Ok(node_id)
    }

    /// Append a text, CDATA, or comment node under the innermost open element
    fn append_character_data(&mut self, kind: NodeKind, content: &[u8], stack: &[NodeId]) {
        let parent_id = *stack.last().unwrap_or(&0);
        let content_id = self.strings.intern(content);
        self.push_node(XmlNode::character_data(kind, content_id, Some(parent_id), depth_of(stack)));
    }

    /// Add a node to the arena and link it under its parent
    fn push_node(&mut self, node: XmlNode) -> NodeId {
        let parent_id = node.parent;
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        if let Some(parent_id) = parent_id {
            self.link_child(parent_id, node_id);
        }
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        match self.get_node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            None => &[],
        }
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

impl DocumentAccess for XmlDocument {
    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.strings.get_str(node.name_id),
            _ => None,
        }
    }

    fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Text | NodeKind::CData | NodeKind::Comment => self.strings.get_str(node.name_id),
            _ => None,
        }
    }

    fn get_attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(node_id)
            .iter()
            .filter_map(|attr| {
                let name = self.strings.get_str(attr.name_id)?;
                let value = self.strings.get_str(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }
}

/// Depth of a node appended under the innermost open node
#[inline]
fn depth_of(stack: &[NodeId]) -> u16 {
    stack.len().min(u16::MAX as usize) as u16
}

/// Find duplicate attribute name
fn find_duplicate_attribute(elem: &StartElement<'_>) -> Option<String> {
    let attrs = &elem.attributes;
    for (i, attr) in attrs.iter().enumerate() {
        if attrs[i + 1..].iter().any(|other| other.name == attr.name) {
            return Some(String::from_utf8_lossy(attr.name.as_ref()).into_owned());
        }
    }
    None
}
