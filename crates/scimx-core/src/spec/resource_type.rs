use serde::Deserialize;

/// SCIM resource type definition
///
/// Binds a primary schema URN and optional extension URNs to a named kind
/// of resource, e.g. `User` served under `/Users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    endpoint: String,
    schema: String,
    #[serde(default)]
    schema_extensions: Vec<SchemaExtension>,
}

/// Reference to a schema extension of a resource type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaExtension {
    schema: String,
    #[serde(default)]
    required: bool,
}

impl ResourceType {
    /// Get the resource type identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the resource type display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the resource type description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the HTTP endpoint the resource type is served under
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the primary schema URN
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Get the declared schema extensions
    pub fn schema_extensions(&self) -> &[SchemaExtension] {
        &self.schema_extensions
    }
}

impl SchemaExtension {
    /// Get the extension schema URN
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Check whether the extension is required
    pub fn required(&self) -> bool {
        self.required
    }
}
