//! Node serialization
//!
//! Renders a node and its descendants to markup. Options select the
//! closing style for empty elements and the attribute quoting; nodes that
//! have no use for an option ignore it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DocType, NodeData, NodeRef};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// How empty elements are closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagClosing {
    /// `<br>` and `<div></div>`
    #[default]
    Html,
    /// `<br />` and `<div />`
    SelfClosing,
}

/// How attribute values are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeQuoting {
    /// Always `name="value"`
    #[default]
    Double,
    /// Unquoted where safe, single quotes when the value holds `"`
    Minimal,
}

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub tag_closing: TagClosing,
    pub quoting: AttributeQuoting,
    /// Emit `<div></div>` instead of `<div />` for empty non-void elements
    pub verbose_empty: bool,
    pub remove_comments: bool,
}

impl RenderOptions {
    /// Self-closing markup, as used for XHTML
    pub fn xhtml() -> Self {
        Self {
            tag_closing: TagClosing::SelfClosing,
            ..Self::default()
        }
    }

    /// Adjust these options for a document type
    pub fn for_doc_type(self, doc_type: DocType) -> Self {
        if doc_type.is_xml() {
            Self {
                tag_closing: TagClosing::SelfClosing,
                ..self
            }
        } else {
            self
        }
    }
}

impl<'a> NodeRef<'a> {
    /// Options implied by the tree configuration and this node's document type
    pub fn render_options(&self) -> RenderOptions {
        self.tree().config().render.for_doc_type(self.doc_type())
    }

    /// Serialize this node and its descendants
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Append the serialized node to `out`
    pub fn render_into(&self, out: &mut String) {
        self.render_with(out, &self.render_options());
    }

    /// Append the serialized node to `out` using explicit options
    pub fn render_with(&self, out: &mut String, options: &RenderOptions) {
        match self.data() {
            NodeData::Document { .. } | NodeData::DocumentFragment => {
                self.render_children(out, options);
            }
            NodeData::DocumentType(decl) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(&decl.name);
                if !decl.public_id.is_empty() {
                    out.push_str(" PUBLIC \"");
                    out.push_str(&decl.public_id);
                    out.push('"');
                    if !decl.system_id.is_empty() {
                        out.push_str(" \"");
                        out.push_str(&decl.system_id);
                        out.push('"');
                    }
                } else if !decl.system_id.is_empty() {
                    out.push_str(" SYSTEM \"");
                    out.push_str(&decl.system_id);
                    out.push('"');
                }
                out.push('>');
            }
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for attr in elem.attributes().iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        push_attribute_value(out, value, options.quoting);
                    }
                }

                let is_void = VOID_ELEMENTS.contains(&elem.tag.as_str());
                let self_closing = options.tag_closing == TagClosing::SelfClosing;
                if self.child_nodes().is_empty() && (is_void || (self_closing && !options.verbose_empty)) {
                    out.push_str(if self_closing { " />" } else { ">" });
                    return;
                }

                out.push('>');
                self.render_children(out, options);
                out.push_str("</");
                out.push_str(&elem.tag);
                out.push('>');
            }
            NodeData::Text(text) => {
                if self.in_raw_text_element() {
                    out.push_str(text);
                } else {
                    escape_text(out, text);
                }
            }
            NodeData::Comment(text) => {
                if !options.remove_comments {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
            NodeData::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            NodeData::ProcessingInstruction { target, data } => {
                out.push_str("<?");
                out.push_str(target);
                if !data.is_empty() {
                    out.push(' ');
                    out.push_str(data);
                }
                out.push_str("?>");
            }
        }
    }

    pub(crate) fn render_children(&self, out: &mut String, options: &RenderOptions) {
        for child in self.children() {
            child.render_with(out, options);
        }
    }

    fn in_raw_text_element(&self) -> bool {
        self.parent()
            .and_then(|p| p.node().as_element().map(|e| RAW_TEXT_ELEMENTS.contains(&e.tag.as_str())))
            .unwrap_or(false)
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_attribute_value(out: &mut String, value: &str, quoting: AttributeQuoting) {
    let quote = match quoting {
        AttributeQuoting::Double => '"',
        AttributeQuoting::Minimal => {
            let needs_quotes = value.is_empty()
                || value
                    .chars()
                    .any(|c| c.is_ascii_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`'));
            if !needs_quotes {
                out.push('=');
                escape_attribute(out, value, None);
                return;
            }
            if value.contains('"') && !value.contains('\'') {
                '\''
            } else {
                '"'
            }
        }
    };
    out.push('=');
    out.push(quote);
    escape_attribute(out, value, Some(quote));
    out.push(quote);
}

fn escape_attribute(out: &mut String, value: &str, quote: Option<char>) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if quote == Some('"') => out.push_str("&quot;"),
            '\'' if quote == Some('\'') => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomConfig, DomTree, NodeOperations};

    #[test]
    fn test_empty_element_closing() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let br = tree.create_element("br");
        let node = tree.node(div).unwrap();

        assert_eq!(node.render(), "<div></div>");
        assert_eq!(tree.node(br).unwrap().render(), "<br>");

        let mut out = String::new();
        node.render_with(&mut out, &RenderOptions::xhtml());
        assert_eq!(out, "<div />");

        let mut out = String::new();
        let verbose = RenderOptions { verbose_empty: true, ..RenderOptions::xhtml() };
        node.render_with(&mut out, &verbose);
        tree.node(br).unwrap().render_with(&mut out, &verbose);
        assert_eq!(out, "<div></div><br />");
    }

    #[test]
    fn test_attribute_quoting() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.set_attribute(a, "href", "/x?a=1&b=2").unwrap();
        tree.set_attribute(a, "title", "say \"hi\"").unwrap();
        tree.set_attribute(a, "rel", "nofollow").unwrap();
        tree.set_boolean_attribute(a, "download").unwrap();
        let node = tree.node(a).unwrap();

        assert_eq!(
            node.render(),
            r#"<a href="/x?a=1&amp;b=2" title="say &quot;hi&quot;" rel="nofollow" download></a>"#
        );

        let mut out = String::new();
        let minimal = RenderOptions { quoting: AttributeQuoting::Minimal, ..RenderOptions::default() };
        node.render_with(&mut out, &minimal);
        assert_eq!(out, r#"<a href="/x?a=1&amp;b=2" title='say "hi"' rel=nofollow download></a>"#);
    }

    #[test]
    fn test_text_escaping_and_raw_text() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("a < b & c");
        tree.append_child(p, text).unwrap();
        assert_eq!(tree.node(p).unwrap().render(), "<p>a &lt; b &amp; c</p>");

        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b) {}");
        tree.append_child(script, code).unwrap();
        assert_eq!(tree.node(script).unwrap().render(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_character_data_and_declarations() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let doctype = tree.create_doctype("html", "", "");
        let pi = tree.create_processing_instruction("xml-stylesheet", "href=\"a.css\"");
        let comment = tree.create_comment(" note ");
        let cdata = tree.create_cdata("x<y");
        for id in [doctype, pi, comment, cdata] {
            tree.append_child(doc, id).unwrap();
        }
        let node = tree.node(doc).unwrap();
        assert_eq!(
            node.render(),
            "<!DOCTYPE html><?xml-stylesheet href=\"a.css\"?><!-- note --><![CDATA[x<y]]>"
        );

        let mut out = String::new();
        node.render_with(&mut out, &RenderOptions { remove_comments: true, ..RenderOptions::default() });
        assert!(!out.contains("note"));
    }

    #[test]
    fn test_xhtml_document_self_closes() {
        let mut tree = DomTree::with_config(DomConfig {
            default_doc_type: DocType::Xhtml,
            ..DomConfig::default()
        });
        let doc = tree.create_document();
        let br = tree.create_element("br");
        tree.append_child(doc, br).unwrap();
        assert_eq!(tree.node(doc).unwrap().to_string(), "<br />");
    }
}
