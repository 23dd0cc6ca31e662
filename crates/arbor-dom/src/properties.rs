//! Element-like properties on the shared node interface
//!
//! Every node answers every accessor. Reads on a kind that lacks the
//! property return `None`/`false`/empty; writes fail with
//! [`DomError::InvalidOperation`].

use crate::container::NodeOperations;
use crate::{
    Attributes, Capabilities, DomResult, DomTree, NodeData, NodeId, NodeRef, StyleDeclaration,
};

/// Parser collaborator used for `inner_html` assignment
pub trait FragmentParser {
    /// Parse `html` into detached nodes created in `tree`
    fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> DomResult<Vec<NodeId>>;
}

impl<'a> NodeRef<'a> {
    fn element_attr(&self, name: &str) -> Option<&'a str> {
        self.node().as_element()?.get_attr(name)
    }

    /// DOM `nodeName`
    pub fn node_name(&self) -> String {
        match self.data() {
            NodeData::Element(e) => e.tag.to_ascii_uppercase(),
            NodeData::Text(_) => "#text".into(),
            NodeData::Comment(_) => "#comment".into(),
            NodeData::CData(_) => "#cdata-section".into(),
            NodeData::Document { .. } => "#document".into(),
            NodeData::DocumentFragment => "#document-fragment".into(),
            NodeData::ProcessingInstruction { target, .. } => target.clone(),
            NodeData::DocumentType(decl) => decl.name.clone(),
        }
    }

    /// Character data of text-like nodes
    pub fn node_value(&self) -> Option<&'a str> {
        match self.data() {
            NodeData::Text(s) | NodeData::Comment(s) | NodeData::CData(s) => Some(s),
            NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&'a Attributes> {
        self.node().as_element().map(|e| e.attributes())
    }

    pub fn style(&self) -> Option<&'a StyleDeclaration> {
        self.node().as_element().map(|e| e.style())
    }

    pub fn classes(&self) -> impl Iterator<Item = &'a str> {
        self.node().as_element().into_iter().flat_map(|e| e.classes().iter())
    }

    pub fn class_name(&self) -> Option<String> {
        self.node().as_element().map(|e| e.classes().value())
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element_attr("id")
    }

    pub fn value(&self) -> Option<&'a str> {
        self.element_attr("value")
    }

    /// The `type` attribute
    pub fn type_attribute(&self) -> Option<&'a str> {
        self.element_attr("type")
    }

    pub fn name(&self) -> Option<&'a str> {
        self.element_attr("name")
    }

    /// Initial form value: text content for `<textarea>`, otherwise the
    /// `value` attribute
    pub fn default_value(&self) -> Option<String> {
        let elem = self.node().as_element()?;
        if elem.tag == "textarea" {
            self.inner_text().ok()
        } else {
            elem.get_attr("value").map(str::to_owned)
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&'a str> {
        self.element_attr(name)
    }

    /// Indexed attribute access; fails for kinds without attributes
    pub fn attribute(&self, name: &str) -> DomResult<Option<&'a str>> {
        self.node().require(Capabilities::ATTRIBUTES, "attribute")?;
        Ok(self.element_attr(name))
    }

    pub fn has_attributes(&self) -> bool {
        self.attributes().is_some_and(|a| !a.is_empty())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.element_attr(name).is_some()
    }

    pub fn has_classes(&self) -> bool {
        self.node().as_element().is_some_and(|e| !e.classes().is_empty())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node().as_element().is_some_and(|e| e.classes().contains(class))
    }

    pub fn has_styles(&self) -> bool {
        self.style().is_some_and(|s| !s.is_empty())
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.style().is_some_and(|s| s.contains(name))
    }

    pub fn checked(&self) -> bool {
        self.has_attribute("checked")
    }

    pub fn selected(&self) -> bool {
        self.has_attribute("selected")
    }

    /// True for every node except elements without a `readonly` attribute
    pub fn read_only(&self) -> bool {
        match self.node().as_element() {
            Some(e) => e.attributes().contains("readonly"),
            None => true,
        }
    }

    /// False while a streaming parser is still filling the element
    pub fn complete(&self) -> bool {
        self.node().as_element().map_or(true, |e| e.complete)
    }

    /// Concatenated text of all descendant text and CDATA nodes
    pub fn inner_text(&self) -> DomResult<String> {
        self.node().require(Capabilities::INNER_TEXT, "inner_text")?;
        let mut text = String::new();
        for node in self.descendants() {
            if let NodeData::Text(s) | NodeData::CData(s) = node.data() {
                text.push_str(s);
            }
        }
        Ok(text)
    }

    /// Serialized children
    pub fn inner_html(&self) -> DomResult<String> {
        self.node().require(Capabilities::INNER_HTML, "inner_html")?;
        let mut out = String::new();
        self.render_children(&mut out, &self.render_options());
        Ok(out)
    }
}

impl DomTree {
    /// Set an attribute value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_attribute")?.set_attr(name, Some(value));
        Ok(())
    }

    /// Set a valueless (boolean) attribute
    pub fn set_boolean_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_attribute")?.set_attr(name, None);
        Ok(())
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.checked_mut(id)?.element_mut("remove_attribute")?.remove_attr(name))
    }

    /// Add whitespace-separated classes, returning whether any was new
    pub fn add_class(&mut self, id: NodeId, classes: &str) -> DomResult<bool> {
        let elem = self.checked_mut(id)?.element_mut("add_class")?;
        let added = elem.classes.add(classes);
        elem.sync_classes();
        Ok(added)
    }

    /// Remove whitespace-separated classes, returning whether any was present
    pub fn remove_class(&mut self, id: NodeId, classes: &str) -> DomResult<bool> {
        let elem = self.checked_mut(id)?.element_mut("remove_class")?;
        let removed = elem.classes.remove(classes);
        elem.sync_classes();
        Ok(removed)
    }

    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_class_name")?.set_attr("class", Some(class_name));
        Ok(())
    }

    /// Merge `name: value; ...` declarations into the inline style
    pub fn add_style(&mut self, id: NodeId, style: &str) -> DomResult<()> {
        let elem = self.checked_mut(id)?.element_mut("add_style")?;
        elem.style.add(style);
        elem.sync_style();
        Ok(())
    }

    /// Remove one style property, returning whether it was present
    pub fn remove_style(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        let elem = self.checked_mut(id)?.element_mut("remove_style")?;
        let removed = elem.style.remove(name);
        elem.sync_style();
        Ok(removed)
    }

    pub fn set_id(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_id")?.set_attr("id", Some(value));
        Ok(())
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_value")?.set_attr("value", Some(value));
        Ok(())
    }

    pub fn set_type_attribute(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_type")?.set_attr("type", Some(value));
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_name")?.set_attr("name", Some(value));
        Ok(())
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> DomResult<()> {
        self.set_flag(id, "checked", checked, "set_checked")
    }

    pub fn set_read_only(&mut self, id: NodeId, read_only: bool) -> DomResult<()> {
        self.set_flag(id, "readonly", read_only, "set_read_only")
    }

    /// Mark an element as still being filled by a streaming parser
    pub fn set_complete(&mut self, id: NodeId, complete: bool) -> DomResult<()> {
        self.checked_mut(id)?.element_mut("set_complete")?.complete = complete;
        Ok(())
    }

    /// Replace the character data of a text-like node
    pub fn set_node_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let data = self.checked_mut(id)?.character_data_mut("set_node_value")?;
        data.clear();
        data.push_str(value);
        Ok(())
    }

    /// Replace all children with a single text node
    pub fn set_inner_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.checked(id)?.require(Capabilities::INNER_TEXT, "set_inner_text")?;
        self.clear_children(id)?;
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Replace all children with the nodes `parser` produces from `html`
    ///
    /// Nothing changes when parsing fails or a parsed node cannot be
    /// placed under `id`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str, parser: &dyn FragmentParser) -> DomResult<()> {
        self.checked(id)?.require(Capabilities::INNER_HTML, "set_inner_html")?;
        let nodes = parser.parse_fragment(self, html)?;
        for &node in &nodes {
            self.check_insertable(id, node, "set_inner_html")?;
        }
        self.clear_children(id)?;
        for node in nodes {
            self.append_child(id, node)?;
        }
        Ok(())
    }

    pub fn set_default_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let elem = self.checked_mut(id)?.element_mut("set_default_value")?;
        if elem.tag != "textarea" {
            elem.set_attr("value", Some(value));
            return Ok(());
        }
        self.set_inner_text(id, value)
    }

    fn set_flag(&mut self, id: NodeId, attr: &str, on: bool, operation: &'static str) -> DomResult<()> {
        let elem = self.checked_mut(id)?.element_mut(operation)?;
        if on {
            elem.set_attr(attr, None);
        } else {
            elem.remove_attr(attr);
        }
        Ok(())
    }
}
