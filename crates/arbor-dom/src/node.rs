//! DOM Node - Arena entry
//!
//! A node stores its parent link, its child list (containers only), the
//! variant data, and three lazily computed caches:
//! - sibling index, tagged with the parent's child-list generation
//! - own path token, tagged with the index it was derived from
//! - owning document
//!
//! Caches are read through `&self` (`Cell`/`RefCell`) and only invalidated
//! by the structural mutations in `container.rs`.

use std::cell::{Cell, RefCell};

use crate::attributes::{Attributes, ClassList, StyleDeclaration};
use crate::container::{ChildList, Generation};
use crate::{DomError, DomResult, NodeId};

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Text,
    CData,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
}

impl NodeType {
    /// DOM `nodeType` code
    pub fn code(self) -> u16 {
        match self {
            NodeType::Element => 1,
            NodeType::Text => 3,
            NodeType::CData => 4,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CData),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            _ => None,
        }
    }

    /// Operations this kind supports beyond the shared base
    pub const fn capabilities(self) -> Capabilities {
        match self {
            NodeType::Element => Capabilities::CHILDREN
                .or(Capabilities::ATTRIBUTES)
                .or(Capabilities::INNER_TEXT)
                .or(Capabilities::INNER_HTML),
            NodeType::Document | NodeType::DocumentFragment => Capabilities::CHILDREN
                .or(Capabilities::INNER_TEXT)
                .or(Capabilities::INNER_HTML),
            NodeType::Text
            | NodeType::CData
            | NodeType::Comment
            | NodeType::ProcessingInstruction => Capabilities::NODE_VALUE,
            NodeType::DocumentType => Capabilities::NONE,
        }
    }

    /// Check whether this kind may own children
    #[inline]
    pub const fn is_container(self) -> bool {
        self.capabilities().contains(Capabilities::CHILDREN)
    }

    pub const fn supports(self, capability: Capabilities) -> bool {
        self.capabilities().contains(capability)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::CData => "CDATA",
            NodeType::ProcessingInstruction => "processing instruction",
            NodeType::Comment => "comment",
            NodeType::Document => "document",
            NodeType::DocumentType => "document type",
            NodeType::DocumentFragment => "document fragment",
        };
        f.write_str(name)
    }
}

/// Capability set of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Owns an ordered child list
    pub const CHILDREN: Capabilities = Capabilities(0x1);
    /// Attributes, classes and style
    pub const ATTRIBUTES: Capabilities = Capabilities(0x2);
    /// Writable node value
    pub const NODE_VALUE: Capabilities = Capabilities(0x4);
    pub const INNER_TEXT: Capabilities = Capabilities(0x8);
    pub const INNER_HTML: Capabilities = Capabilities(0x10);

    /// Union of two capability sets
    pub const fn or(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }

    /// Check if every capability in `other` is present
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document {
        /// Explicit document type; `DocType::Default` defers to the doctype node
        doc_type: crate::DocType,
    },
    /// Lightweight container whose children move on insertion
    DocumentFragment,
    /// DOCTYPE declaration
    DocumentType(DoctypeData),
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// CDATA section
    CData(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document { .. } => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::DocumentType(_) => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::CData(_) => NodeType::CData,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }
}

/// DOCTYPE declaration data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, lower case
    pub tag: String,
    pub(crate) attrs: Attributes,
    pub(crate) classes: ClassList,
    pub(crate) style: StyleDeclaration,
    /// False while a streaming parser is still filling this element
    pub(crate) complete: bool,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Attributes::new(),
            classes: ClassList::new(),
            style: StyleDeclaration::new(),
            complete: true,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    /// Set an attribute; `None` makes it a boolean attribute
    pub(crate) fn set_attr(&mut self, name: &str, value: Option<&str>) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                self.classes.set_value(value.unwrap_or(""));
                self.sync_classes();
            }
            "style" => {
                self.style.set_value(value.unwrap_or(""));
                self.sync_style();
            }
            _ => self.attrs.set(&name, value.map(str::to_string)),
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.classes.clear(),
            "style" => self.style.clear(),
            _ => {}
        }
        self.attrs.remove(&name)
    }

    /// Write the class list back to the `class` attribute
    pub(crate) fn sync_classes(&mut self) {
        if self.classes.is_empty() {
            self.attrs.remove("class");
        } else {
            self.attrs.set("class", Some(self.classes.value()));
        }
    }

    /// Write the style declaration back to the `style` attribute
    pub(crate) fn sync_style(&mut self) {
        if self.style.is_empty() {
            self.attrs.remove("style");
        } else {
            self.attrs.set("style", Some(self.style.value()));
        }
    }
}

/// Memoized sibling position
#[derive(Debug, Clone, Copy)]
pub(crate) struct CachedIndex {
    /// Parent child-list generation this index was computed against
    pub generation: Generation,
    pub index: u32,
}

/// DOM Node - one entry in the tree arena
#[derive(Debug)]
pub struct Node {
    /// Parent container (non-owning)
    pub(crate) parent: Option<NodeId>,
    /// Child list, present only for container kinds
    pub(crate) children: Option<ChildList>,
    pub(crate) index: Cell<Option<CachedIndex>>,
    pub(crate) path_token: RefCell<Option<(u32, Box<str>)>>,
    pub(crate) document: Cell<Option<NodeId>>,
    pub(crate) data: NodeData,
}

impl Node {
    /// Create a detached node
    pub fn new(data: NodeData) -> Self {
        let children = data.node_type().is_container().then(ChildList::new);
        Self {
            parent: None,
            children,
            index: Cell::new(None),
            path_token: RefCell::new(None),
            document: Cell::new(None),
            data,
        }
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order (empty for non-containers)
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        self.children.as_ref().map(ChildList::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Element data, or the default-deny error for `operation`
    pub(crate) fn element_mut(&mut self, operation: &'static str) -> DomResult<&mut ElementData> {
        let kind = self.node_type();
        match &mut self.data {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::not_applicable(operation, kind)),
        }
    }

    /// Character data, or the default-deny error for `operation`
    pub(crate) fn character_data_mut(&mut self, operation: &'static str) -> DomResult<&mut String> {
        let kind = self.node_type();
        match &mut self.data {
            NodeData::Text(s) | NodeData::Comment(s) | NodeData::CData(s) => Ok(s),
            NodeData::ProcessingInstruction { data, .. } => Ok(data),
            _ => Err(DomError::not_applicable(operation, kind)),
        }
    }

    /// Fail unless this kind has `capability`
    pub(crate) fn require(&self, capability: Capabilities, operation: &'static str) -> DomResult<()> {
        let kind = self.node_type();
        if kind.supports(capability) {
            Ok(())
        } else {
            Err(DomError::not_applicable(operation, kind))
        }
    }

    /// Child list, or the default-deny error for `operation`
    pub(crate) fn child_list(&self, operation: &'static str) -> DomResult<&ChildList> {
        self.children
            .as_ref()
            .ok_or_else(|| DomError::not_applicable(operation, self.node_type()))
    }

    pub(crate) fn child_list_mut(&mut self, operation: &'static str) -> DomResult<&mut ChildList> {
        let kind = self.node_type();
        self.children
            .as_mut()
            .ok_or_else(|| DomError::not_applicable(operation, kind))
    }

    /// Drop cached index and path token
    pub(crate) fn invalidate_position(&mut self) {
        self.index.set(None);
        self.path_token.get_mut().take();
    }

    /// Deep copy of the variant data, detached and with empty caches
    pub(crate) fn clone_detached(&self) -> Self {
        Self::new(self.data.clone())
    }
}
