//! Entity snapshots and their document form.

use hearth_core::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One addressable entity as reported by the host platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity identifier, `domain.object_id`.
    pub entity_id: String,
    /// Friendly name.
    pub name: String,
    /// Entity domain (`light`, `sensor`, ...).
    pub domain: String,
    /// Raw attribute map from the platform.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Whether the entity is exposed to the assistant. Absent means exposed.
    #[serde(default = "default_exposed")]
    pub exposed: bool,
}

fn default_exposed() -> bool {
    true
}

impl EntitySnapshot {
    /// Create a snapshot with no attributes, exposed.
    pub fn new(
        entity_id: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
            domain: domain.into(),
            attributes: Map::new(),
            exposed: true,
        }
    }
}

/// Keep only the entities exposed to the assistant.
pub fn exposed_only(entities: Vec<EntitySnapshot>) -> Vec<EntitySnapshot> {
    entities.into_iter().filter(|e| e.exposed).collect()
}

/// Build the retrieval document for one entity.
///
/// The content shape is what gets embedded, so it stays stable across
/// rebuilds: identifier, friendly name, then the raw attribute map.
pub fn document_for_entity(entity: &EntitySnapshot) -> Document {
    let attributes = Value::Object(entity.attributes.clone());
    let content = format!(
        "Entity: {}\nName: {}\nAttributes: {}\n",
        entity.entity_id, entity.name, attributes
    );
    Document::new(content, entity.entity_id.clone(), entity.domain.clone())
}
