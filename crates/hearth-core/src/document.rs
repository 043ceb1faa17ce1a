//! Retrieval documents.
//!
//! A [`Document`] is the indexed text + metadata view of one platform
//! entity. Documents are immutable once embedded; their lifecycle is bound
//! to an index rebuild cycle.

use serde::{Deserialize, Serialize};

/// Metadata carried alongside a document's content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// The entity this document describes, e.g. `light.office_lamp`.
    pub entity_id: String,
    /// The entity's domain. May be empty for documents built from legacy
    /// artifacts; [`Document::domain`] falls back to the entity id prefix.
    #[serde(default)]
    pub domain: String,
}

/// One entry of the retrieval index: entity description text plus metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The embedded text.
    pub content: String,
    /// Entity id and domain.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document.
    pub fn new(
        content: impl Into<String>,
        entity_id: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                entity_id: entity_id.into(),
                domain: domain.into(),
            },
        }
    }

    /// The document's domain, derived from the entity id when the metadata
    /// field is empty.
    pub fn domain(&self) -> &str {
        if !self.metadata.domain.is_empty() {
            return &self.metadata.domain;
        }
        self.metadata
            .entity_id
            .split_once('.')
            .map_or("unknown", |(domain, _)| domain)
    }
}
