//! Document type resolution

use serde::{Deserialize, Serialize};

use crate::{DoctypeData, DomError, DomResult, DomTree, NodeData, NodeId, NodeRef};

/// HTML document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Defer to the doctype declaration, then to [`crate::DomConfig`]
    #[default]
    Default,
    Html5,
    /// HTML 4 Transitional
    Html4,
    /// XHTML: every tag is explicitly closed
    Xhtml,
    /// Unsupported document type
    Unknown,
    Html4Strict,
}

impl DocType {
    /// Classify a `<!DOCTYPE>` declaration
    pub fn from_declaration(decl: &DoctypeData) -> Self {
        if !decl.name.eq_ignore_ascii_case("html") {
            return DocType::Unknown;
        }
        let public_id = decl.public_id.to_ascii_uppercase();
        if public_id.is_empty() {
            return if decl.system_id.is_empty() || decl.system_id == "about:legacy-compat" {
                DocType::Html5
            } else {
                DocType::Unknown
            };
        }
        if public_id.contains("XHTML") {
            DocType::Xhtml
        } else if public_id.contains("HTML 4") {
            if public_id.contains("TRANSITIONAL") || public_id.contains("FRAMESET") {
                DocType::Html4
            } else {
                DocType::Html4Strict
            }
        } else {
            DocType::Unknown
        }
    }

    /// True when void and empty elements must be explicitly closed
    pub fn is_xml(self) -> bool {
        self == DocType::Xhtml
    }
}

impl<'a> NodeRef<'a> {
    /// First `<!DOCTYPE>` child of the owning document
    pub fn doctype(&self) -> Option<NodeRef<'a>> {
        self.document()?
            .children()
            .find(|c| matches!(c.data(), NodeData::DocumentType(_)))
    }

    /// Effective document type: explicit document setting, then the
    /// doctype declaration, then the tree configuration
    pub fn doc_type(&self) -> DocType {
        let configured = match self.tree().config().default_doc_type {
            DocType::Default => DocType::Html5,
            other => other,
        };
        let Some(doc) = self.document() else {
            return configured;
        };
        if let NodeData::Document { doc_type } = doc.data() {
            if *doc_type != DocType::Default {
                return *doc_type;
            }
        }
        match self.doctype().map(|d| d.data()) {
            Some(NodeData::DocumentType(decl)) => DocType::from_declaration(decl),
            _ => configured,
        }
    }
}

impl DomTree {
    /// Set a document's explicit type; `DocType::Default` clears it
    pub fn set_doc_type(&mut self, document: NodeId, doc_type: DocType) -> DomResult<()> {
        let node = self.checked_mut(document)?;
        let kind = node.node_type();
        match &mut node.data {
            NodeData::Document { doc_type: current } => {
                tracing::debug!("Document {} doc type {:?} -> {:?}", document, current, doc_type);
                *current = doc_type;
                Ok(())
            }
            _ => Err(DomError::not_applicable("set_doc_type", kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomConfig, NodeOperations};

    fn decl(name: &str, public_id: &str, system_id: &str) -> DoctypeData {
        DoctypeData {
            name: name.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        }
    }

    #[test]
    fn test_classify_declarations() {
        assert_eq!(DocType::from_declaration(&decl("html", "", "")), DocType::Html5);
        assert_eq!(DocType::from_declaration(&decl("HTML", "", "about:legacy-compat")), DocType::Html5);
        assert_eq!(
            DocType::from_declaration(&decl(
                "html",
                "-//W3C//DTD XHTML 1.0 Strict//EN",
                "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"
            )),
            DocType::Xhtml
        );
        assert_eq!(
            DocType::from_declaration(&decl("html", "-//W3C//DTD HTML 4.01 Transitional//EN", "")),
            DocType::Html4
        );
        assert_eq!(
            DocType::from_declaration(&decl("html", "-//W3C//DTD HTML 4.01//EN", "")),
            DocType::Html4Strict
        );
        assert_eq!(DocType::from_declaration(&decl("svg", "", "")), DocType::Unknown);
    }

    #[test]
    fn test_doc_type_resolution_order() {
        let mut tree = DomTree::with_config(DomConfig {
            default_doc_type: DocType::Html4,
            ..DomConfig::default()
        });
        let doc = tree.create_document();
        let body = tree.create_element("body");
        tree.append_child(doc, body).unwrap();
        assert_eq!(tree.node(body).unwrap().doc_type(), DocType::Html4);

        let doctype = tree.create_doctype("html", "-//W3C//DTD XHTML 1.0 Strict//EN", "");
        tree.insert_child(doc, 0, doctype).unwrap();
        assert_eq!(tree.node(body).unwrap().doc_type(), DocType::Xhtml);

        tree.set_doc_type(doc, DocType::Html5).unwrap();
        assert_eq!(tree.node(body).unwrap().doc_type(), DocType::Html5);

        let loose = tree.create_element("p");
        assert_eq!(tree.node(loose).unwrap().doc_type(), DocType::Html4);
        assert!(matches!(
            tree.set_doc_type(loose, DocType::Html5),
            Err(DomError::InvalidOperation { .. })
        ));
    }
}
