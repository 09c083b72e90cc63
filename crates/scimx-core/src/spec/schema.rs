use super::Attribute;
use serde::Deserialize;
use std::sync::Arc;

/// SCIM schema document
///
/// A named set of attribute definitions identified by URN. Registered
/// schemas are composed into a resource root by the registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    attributes: Vec<Arc<Attribute>>,
}

impl Schema {
    /// Get the schema URN
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the schema display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the schema description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the top-level attributes declared by this schema
    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }
}
