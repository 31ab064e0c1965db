//! DOM Module - Arena-based XML Document
//!
//! Implements an efficient DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, attribute values, and character data

pub mod document;
pub mod node;
pub mod strings;

pub use document::XmlDocument;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;

/// Read-only view over a parsed document
///
/// Tree projection only goes through this trait, so any XML engine that can
/// expose its nodes this way can stand in for the built-in arena.
pub trait DocumentAccess {
    /// Get root element ID
    fn root_element_id(&self) -> Option<NodeId>;

    /// Get the kind of a node
    fn node_kind(&self, id: NodeId) -> Option<NodeKind>;

    /// Get node name as string (elements and PIs)
    fn node_name(&self, id: NodeId) -> Option<&str>;

    /// Get character data of a text, CDATA, or comment node
    fn text_content(&self, id: NodeId) -> Option<&str>;

    /// Get all attribute names and values for an element, in document order
    fn get_attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)>;

    /// Children of a node, in document order
    fn children_vec(&self, id: NodeId) -> Vec<NodeId>;
}
