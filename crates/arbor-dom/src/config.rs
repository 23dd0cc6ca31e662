//! Tree Configuration

use serde::{Deserialize, Serialize};

use crate::{DocType, RenderOptions};

/// Document-wide defaults, threaded through [`crate::DomTree::with_config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Document type used when a document declares none
    pub default_doc_type: DocType,

    /// Base rendering options, adjusted per document type
    pub render: RenderOptions,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            default_doc_type: DocType::Html5,
            render: RenderOptions::default(),
        }
    }
}
