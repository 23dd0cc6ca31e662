//! DOM Tree (arena-based allocation)
//!
//! The tree owns every node. Nodes are addressed by [`NodeId`] and stay in
//! the arena for the lifetime of the tree, so an id held after removal
//! still resolves to a (disconnected) node.

use crate::node::CachedIndex;
use crate::{
    path, DoctypeData, DocType, DomConfig, DomError, DomResult, ElementData, Node, NodeData, NodeId,
    NodeType,
};

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    config: DomConfig,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self::with_config(DomConfig::default())
    }

    /// Create a tree whose documents fall back to `config`
    pub fn with_config(config: DomConfig) -> Self {
        tracing::debug!("Creating DOM tree (default doc type {:?})", config.default_doc_type);
        Self { nodes: Vec::new(), config }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached node from raw data
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.push(Node::new(data))
    }

    pub fn create_document(&mut self) -> NodeId {
        self.create_node(NodeData::Document { doc_type: DocType::Default })
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.create_node(NodeData::DocumentFragment)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_node(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create_node(NodeData::Text(content.to_string()))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create_node(NodeData::Comment(content.to_string()))
    }

    pub fn create_cdata(&mut self, content: &str) -> NodeId {
        self.create_node(NodeData::CData(content.to_string()))
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.create_node(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.create_node(NodeData::DocumentType(DoctypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Read-only handle to a node
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| self.node_ref(id))
    }

    /// Handle for an id already known to be in the arena
    #[inline]
    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    pub(crate) fn checked(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.index()).ok_or(DomError::NotFound(id))
    }

    pub(crate) fn checked_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cache the index of every child of `parent` in one pass
    fn renumber(&self, parent: &Node) {
        let Some(list) = parent.children.as_ref() else {
            return;
        };
        let generation = list.generation();
        for (index, &child) in list.as_slice().iter().enumerate() {
            self.nodes[child.index()].index.set(Some(CachedIndex {
                generation,
                index: index as u32,
            }));
        }
    }
}

/// Read-only handle to a node in a [`DomTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.node_type())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    #[inline]
    pub fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.index()]
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.node().node_type()
    }

    #[inline]
    pub fn data(&self) -> &'a NodeData {
        &self.node().data
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.node().is_element()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|p| self.tree.node_ref(p))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Check whether `other` is a strict descendant of this node
    pub fn is_ancestor_of(&self, other: NodeId) -> bool {
        self.tree
            .node(other)
            .map(|n| n.ancestors().any(|a| a.id == self.id))
            .unwrap_or(false)
    }

    /// Zero-based position among siblings (0 for a parentless node)
    pub fn index(&self) -> usize {
        let node = self.node();
        let Some(parent) = node.parent else {
            return 0;
        };
        let parent = &self.tree.nodes[parent.index()];
        let generation = match parent.children.as_ref() {
            Some(list) => list.generation(),
            None => return 0,
        };

        match node.index.get() {
            Some(cached) if cached.generation == generation => cached.index as usize,
            _ => {
                self.tree.renumber(parent);
                node.index.get().map(|c| c.index as usize).unwrap_or(0)
            }
        }
    }

    /// This level's path token (empty for a document)
    pub fn path_token(&self) -> String {
        if self.node_type() == NodeType::Document {
            return String::new();
        }
        let index = self.index() as u32;
        let mut cache = self.node().path_token.borrow_mut();
        if let Some((cached, token)) = cache.as_ref() {
            if *cached == index {
                return token.to_string();
            }
        }
        let token = path::encode(index);
        *cache = Some((index, token.clone().into_boxed_str()));
        token
    }

    /// Concatenated tokens, root-most first; disconnected roots are prefixed with `_`
    pub fn path(&self) -> String {
        let mut chain: Vec<NodeRef<'a>> = vec![*self];
        chain.extend(self.ancestors());

        let mut path = String::new();
        if let Some(root) = chain.last() {
            if root.node_type() != NodeType::Document {
                path.push('_');
            }
        }
        for node in chain.iter().rev() {
            path.push_str(&node.path_token());
        }
        path
    }

    /// Number of ancestor links to the root
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Owning document, resolved through the parent chain and cached
    pub fn document(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        let mut unresolved = Vec::new();
        let mut current = self.id;

        let found = loop {
            let node = &tree.nodes[current.index()];
            if node.node_type() == NodeType::Document {
                break Some(current);
            }
            if let Some(doc) = node.document.get() {
                break Some(doc);
            }
            unresolved.push(current);
            match node.parent {
                Some(parent) => current = parent,
                None => break None,
            }
        };

        let doc = found?;
        for id in unresolved {
            tree.nodes[id.index()].document.set(Some(doc));
        }
        Some(tree.node_ref(doc))
    }

    /// True when no owning document can be resolved
    pub fn is_disconnected(&self) -> bool {
        self.document().is_none()
    }

    /// Child ids in order (empty for non-containers)
    pub fn child_nodes(&self) -> &'a [NodeId] {
        self.node().children()
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> {
        let tree = self.tree;
        self.child_nodes().iter().map(move |&id| tree.node_ref(id))
    }

    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> {
        self.children().filter(NodeRef::is_element)
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.children().next_back()
    }

    pub fn first_element_child(&self) -> Option<NodeRef<'a>> {
        self.child_elements().next()
    }

    pub fn last_element_child(&self) -> Option<NodeRef<'a>> {
        self.child_elements().next_back()
    }

    /// Child at `index`; fails for kinds without children
    pub fn child(&self, index: usize) -> DomResult<NodeRef<'a>> {
        let list = self.node().child_list("child")?;
        list.get(index)
            .map(|id| self.tree.node_ref(id))
            .ok_or(DomError::IndexOutOfRange { index, len: list.len() })
    }

    /// Position of `child` in this node's child list
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        let child = self.tree.node(child)?;
        (child.node().parent == Some(self.id)).then(|| child.index())
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        let siblings = self.parent()?.child_nodes();
        let id = siblings.get(self.index() + 1)?;
        Some(self.tree.node_ref(*id))
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        let siblings = self.parent()?.child_nodes();
        let id = siblings.get(self.index().checked_sub(1)?)?;
        Some(self.tree.node_ref(*id))
    }

    /// Next element among the following siblings (none without a parent)
    pub fn next_element_sibling(&self) -> Option<NodeRef<'a>> {
        let siblings = self.parent()?.child_nodes();
        let following = siblings.get(self.index() + 1..).unwrap_or(&[]);
        following
            .iter()
            .map(|&id| self.tree.node_ref(id))
            .find(NodeRef::is_element)
    }

    /// Nearest element among the preceding siblings (none without a parent)
    pub fn previous_element_sibling(&self) -> Option<NodeRef<'a>> {
        let siblings = self.parent()?.child_nodes();
        let preceding = siblings.get(..self.index()).unwrap_or(&[]);
        preceding
            .iter()
            .rev()
            .map(|&id| self.tree.node_ref(id))
            .find(NodeRef::is_element)
    }

    /// Descendants in document order, excluding this node
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack = self.child_nodes().to_vec();
        stack.reverse();
        Descendants { tree: self.tree, stack }
    }

    pub fn descendant_count(&self) -> usize {
        self.descendants().count()
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node_ref(id);
        self.stack.extend(node.child_nodes().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::NodeOperations;

    fn list(tree: &mut DomTree, n: usize) -> (NodeId, Vec<NodeId>) {
        let ul = tree.create_element("ul");
        let items = (0..n)
            .map(|_| {
                let li = tree.create_element("li");
                tree.append_child(ul, li).unwrap();
                li
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn test_tree_empty() {
        let tree = DomTree::new();
        assert!(tree.is_empty());
        assert!(tree.get(NodeId(999)).is_none());
        assert!(tree.node(NodeId(999)).is_none());
    }

    #[test]
    fn test_index_tracks_insertions() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);
        assert_eq!(tree.node(items[2]).unwrap().index(), 2);

        let first = tree.create_element("li");
        tree.insert_child(ul, 0, first).unwrap();
        assert_eq!(tree.node(first).unwrap().index(), 0);
        assert_eq!(tree.node(items[2]).unwrap().index(), 3);

        tree.remove(items[0]).unwrap();
        assert_eq!(tree.node(items[2]).unwrap().index(), 2);
        assert_eq!(tree.node(items[0]).unwrap().index(), 0);
    }

    #[test]
    fn test_path_token_follows_index() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 2);
        assert_eq!(tree.node(items[1]).unwrap().path_token(), "001");

        tree.remove(items[0]).unwrap();
        assert_eq!(tree.node(items[1]).unwrap().path_token(), "000");
        assert_eq!(tree.node(items[1]).unwrap().path(), "_000000");
        assert_eq!(tree.node(ul).unwrap().path(), "_000");
    }

    #[test]
    fn test_siblings() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);
        let text = tree.create_text("x");
        tree.insert_after(ul, text, items[0]).unwrap();

        let first = tree.node(items[0]).unwrap();
        assert!(first.previous_sibling().is_none());
        assert_eq!(first.next_sibling().map(|n| n.node_id()), Some(text));
        assert_eq!(first.next_element_sibling().map(|n| n.node_id()), Some(items[1]));

        let last = tree.node(items[2]).unwrap();
        assert!(last.next_sibling().is_none());
        assert!(last.next_element_sibling().is_none());
        assert_eq!(
            tree.node(items[1]).unwrap().previous_element_sibling().map(|n| n.node_id()),
            Some(items[0])
        );

        let lone = tree.node(ul).unwrap();
        assert!(lone.next_element_sibling().is_none());
        assert!(lone.previous_element_sibling().is_none());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let a = tree.create_element("a");
        let a1 = tree.create_text("1");
        let b = tree.create_element("b");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(root, b).unwrap();

        let order: Vec<_> = tree.node(root).unwrap().descendants().map(|n| n.node_id()).collect();
        assert_eq!(order, vec![a, a1, b]);
        assert_eq!(tree.node(root).unwrap().descendant_count(), 3);
        assert_eq!(tree.node(a1).unwrap().descendant_count(), 0);
    }

    #[test]
    fn test_document_cache() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let (ul, items) = list(&mut tree, 1);
        assert!(tree.node(items[0]).unwrap().is_disconnected());

        tree.append_child(doc, ul).unwrap();
        let item = tree.node(items[0]).unwrap();
        assert_eq!(item.document().map(|d| d.node_id()), Some(doc));
        assert_eq!(tree.nodes[ul.index()].document.get(), Some(doc));
        assert_eq!(tree.node(doc).unwrap().document().map(|d| d.node_id()), Some(doc));
    }
}
