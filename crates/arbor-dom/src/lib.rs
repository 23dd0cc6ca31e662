//! Arbor DOM - Document tree node model
//!
//! Arena-backed node model shared by the parser, the selector engine and
//! the serializer. Every node kind exposes the same interface; operations a
//! kind does not support fail with [`DomError::InvalidOperation`].
//!
//! # Example
//! ```rust
//! use arbor_dom::{DomTree, NodeOperations};
//!
//! let mut tree = DomTree::new();
//! let doc = tree.create_document();
//! let div = tree.create_element("div");
//! tree.append_child(doc, div).unwrap();
//!
//! let node = tree.node(div).unwrap();
//! assert_eq!(node.depth(), 1);
//! assert_eq!(node.document().map(|d| d.node_id()), Some(doc));
//! ```

mod attributes;
mod config;
mod container;
mod document;
mod error;
mod node;
pub mod path;
mod properties;
mod render;
mod tree;

pub use attributes::{Attribute, Attributes, ClassList, StyleDeclaration};
pub use config::DomConfig;
pub use container::{ChildList, Generation, NodeOperations};
pub use document::DocType;
pub use error::{DomError, DomResult};
pub use node::{Capabilities, DoctypeData, ElementData, Node, NodeData, NodeType};
pub use properties::FragmentParser;
pub use render::{AttributeQuoting, RenderOptions, TagClosing};
pub use tree::{Descendants, DomTree, NodeRef};

/// Node identifier (index into the tree arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of this node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
