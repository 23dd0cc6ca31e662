//! Container capability and structural mutation
//!
//! `append_child`, `insert_before`, `remove_child` and friends are the only
//! code paths that set a node's parent link or invalidate its caches.
//!
//! Sibling indices are invalidated lazily: each child list carries a
//! generation that is bumped on every structural change, and a cached index
//! is only trusted while its generation matches. Attaching clears the
//! attached node's own document cache; detaching clears the document cache
//! of the whole detached subtree.
//!
//! Iterating a child list while mutating it is not supported: collect the
//! ids first (`children().to_vec()`), then mutate.

use crate::{DomError, DomResult, DomTree, NodeId, NodeType};

/// Child-list generation, bumped on every structural change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generation(u64);

impl Generation {
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Ordered child sequence owned by a container node
#[derive(Debug, Clone, Default)]
pub struct ChildList {
    nodes: Vec<NodeId>,
    generation: Generation,
}

impl ChildList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Current generation
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Linear scan for `id`
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }

    fn insert(&mut self, index: usize, id: NodeId) {
        self.nodes.insert(index, id);
        self.generation = self.generation.next();
    }

    fn remove(&mut self, index: usize) -> NodeId {
        let id = self.nodes.remove(index);
        self.generation = self.generation.next();
        id
    }
}

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert a child at `index` (counted after `child` leaves its old position)
    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> DomResult<NodeId>;

    /// Insert immediately before a reference child
    fn insert_before(&mut self, parent: NodeId, new_child: NodeId, ref_child: NodeId) -> DomResult<NodeId>;

    /// Insert immediately after a reference child
    fn insert_after(&mut self, parent: NodeId, new_child: NodeId, ref_child: NodeId) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Replace a child with another node, returning the old child
    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId>;

    /// Remove a node from its parent
    fn remove(&mut self, node: NodeId) -> DomResult<NodeId>;

    /// Remove every child of a container
    fn clear_children(&mut self, parent: NodeId) -> DomResult<()>;

    /// Deep copy a node; the copy is detached
    fn clone_node(&mut self, node: NodeId) -> DomResult<NodeId>;
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check_insertable(parent, child, "append_child")?;
        self.detach(child)?;
        let position = self.nodes[parent.index()].children().len();
        self.insert_resolved(parent, child, position)?;
        Ok(child)
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> DomResult<NodeId> {
        self.check_insertable(parent, child, "insert_child")?;
        let mut len = self.nodes[parent.index()].children().len();
        if self.nodes[child.index()].parent == Some(parent) {
            len -= 1;
        }
        if index > len {
            return Err(DomError::IndexOutOfRange { index, len });
        }
        self.detach(child)?;
        self.insert_resolved(parent, child, index)?;
        Ok(child)
    }

    fn insert_before(&mut self, parent: NodeId, new_child: NodeId, ref_child: NodeId) -> DomResult<NodeId> {
        self.insert_relative(parent, new_child, ref_child, 0, "insert_before")
    }

    fn insert_after(&mut self, parent: NodeId, new_child: NodeId, ref_child: NodeId) -> DomResult<NodeId> {
        self.insert_relative(parent, new_child, ref_child, 1, "insert_after")
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.checked(parent)?.child_list("remove_child")?;
        self.check_child(parent, child)?;
        self.detach(child)?;
        Ok(child)
    }

    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        self.check_insertable(parent, new_child, "replace_child")?;
        self.check_child(parent, old_child)?;
        if new_child == old_child {
            return Ok(old_child);
        }
        self.detach(new_child)?;
        let position = self.node_ref(old_child).index();
        self.detach(old_child)?;
        self.insert_resolved(parent, new_child, position)?;
        Ok(old_child)
    }

    fn remove(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self.checked(node)?.parent.ok_or(DomError::NoParent(node))?;
        self.remove_child(parent, node)
    }

    fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
        let children = self.checked(parent)?.child_list("clear_children")?.as_slice().to_vec();
        // Detach from the back so earlier positions stay valid
        for child in children.into_iter().rev() {
            self.detach(child)?;
        }
        Ok(())
    }

    fn clone_node(&mut self, node: NodeId) -> DomResult<NodeId> {
        let copy = self.checked(node)?.clone_detached();
        let root = self.push(copy);

        let mut stack = vec![(node, root)];
        let mut copied = 1usize;
        while let Some((source, target)) = stack.pop() {
            let children = self.nodes[source.index()].children().to_vec();
            for (position, child) in children.into_iter().enumerate() {
                let copy = self.nodes[child.index()].clone_detached();
                let child_copy = self.push(copy);
                self.attach(target, child_copy, position)?;
                stack.push((child, child_copy));
                copied += 1;
            }
        }

        tracing::debug!("Cloned {} into {} ({} nodes)", node, root, copied);
        Ok(root)
    }
}

impl DomTree {
    /// Validate that `child` may be placed under `parent`
    pub(crate) fn check_insertable(&self, parent: NodeId, child: NodeId, operation: &'static str) -> DomResult<()> {
        let parent_node = self.checked(parent)?;
        parent_node.child_list(operation)?;
        let child_kind = self.checked(child)?.node_type();

        let refuse = |reason: &'static str| -> DomResult<()> {
            Err(DomError::HierarchyRequest { node: child, parent, reason })
        };
        if child_kind == NodeType::Document {
            return refuse("a document cannot be a child");
        }
        if child_kind == NodeType::DocumentType && parent_node.node_type() != NodeType::Document {
            return refuse("a document type can only be a child of a document");
        }
        if child == parent || self.node_ref(child).is_ancestor_of(parent) {
            return refuse("the node is an ancestor of the new parent");
        }
        Ok(())
    }

    fn check_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.checked(child)?.parent == Some(parent) {
            Ok(())
        } else {
            Err(DomError::NotAChild { node: child, parent })
        }
    }

    fn insert_relative(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: NodeId,
        offset: usize,
        operation: &'static str,
    ) -> DomResult<NodeId> {
        self.check_insertable(parent, new_child, operation)?;
        self.check_child(parent, ref_child)?;
        if new_child == ref_child {
            return Ok(new_child);
        }
        self.detach(new_child)?;
        let position = self.node_ref(ref_child).index() + offset;
        self.insert_resolved(parent, new_child, position)?;
        Ok(new_child)
    }

    /// Insert a detached node at `position`; fragments contribute their children instead
    fn insert_resolved(&mut self, parent: NodeId, child: NodeId, position: usize) -> DomResult<()> {
        if self.nodes[child.index()].node_type() != NodeType::DocumentFragment {
            return self.attach(parent, child, position);
        }

        let moved = self.nodes[child.index()].children().to_vec();
        for &id in moved.iter().rev() {
            self.detach(id)?;
        }
        for (offset, id) in moved.into_iter().enumerate() {
            self.attach(parent, id, position + offset)?;
        }
        Ok(())
    }

    /// Link a detached node into `parent` at `position`
    fn attach(&mut self, parent: NodeId, child: NodeId, position: usize) -> DomResult<()> {
        let list = self.nodes[parent.index()].child_list_mut("append_child")?;
        if position > list.len() {
            return Err(DomError::IndexOutOfRange { index: position, len: list.len() });
        }
        list.insert(position, child);

        let node = &mut self.nodes[child.index()];
        node.parent = Some(parent);
        node.invalidate_position();
        node.document.set(None);

        tracing::trace!("Attached {} to {} at {}", child, parent, position);
        Ok(())
    }

    /// Unlink a node from its parent, disconnecting its subtree
    fn detach(&mut self, child: NodeId) -> DomResult<()> {
        let Some(parent) = self.nodes[child.index()].parent else {
            return Ok(());
        };
        let position = self.node_ref(child).index();
        self.nodes[parent.index()].child_list_mut("remove_child")?.remove(position);

        let node = &mut self.nodes[child.index()];
        node.parent = None;
        node.invalidate_position();
        self.disconnect(child);

        tracing::trace!("Detached {} from {}", child, parent);
        Ok(())
    }

    /// Clear the cached document of `root` and every descendant
    fn disconnect(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            node.document.set(None);
            stack.extend_from_slice(node.children());
        }
    }
}
