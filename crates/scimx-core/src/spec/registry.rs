use super::{Attribute, ResourceType, Schema};
use crate::errors::{Result, ScimError, ScimErrorKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of schema documents keyed by URN
///
/// Holds the common core schema plus any number of resource schemas, and
/// composes them into a single root attribute per resource type. The root
/// flattens the core and primary schema attributes at the top level and
/// nests each extension under a complex container named by its URN.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    core: Option<Arc<Schema>>,
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the common core schema shared by every resource type
    pub fn register_core(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.core = Some(schema.clone());
        schema
    }

    /// Register a resource schema, keyed by its URN
    pub fn register(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.schemas.insert(schema.id().to_string(), schema.clone());
        schema
    }

    /// Look up a registered resource schema by URN
    pub fn schema(&self, id: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(id)
    }

    /// Compose the root attribute for a resource type
    pub fn resolve(&self, resource_type: &ResourceType) -> Result<Arc<Attribute>> {
        let core = self.core.as_ref().ok_or_else(|| {
            ScimError::new(ScimErrorKind::Internal)
                .with_message("core schema is not registered")
        })?;

        let mut subs: Vec<Arc<Attribute>> = core.attributes().to_vec();

        let primary = self.schemas.get(resource_type.schema()).ok_or_else(|| {
            ScimError::new(ScimErrorKind::Internal).with_message(format!(
                "schema '{}' is not registered",
                resource_type.schema()
            ))
        })?;
        subs.extend(primary.attributes().iter().cloned());

        for extension in resource_type.schema_extensions() {
            let schema = self.schemas.get(extension.schema()).ok_or_else(|| {
                ScimError::new(ScimErrorKind::Internal).with_message(format!(
                    "schema '{}' is not registered",
                    extension.schema()
                ))
            })?;
            subs.push(Arc::new(Attribute::container(
                schema.id(),
                extension.required(),
                schema.attributes().to_vec(),
            )));
        }

        Ok(Arc::new(Attribute::container(
            resource_type.name(),
            false,
            subs,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::stock;

    fn loaded_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register_core(stock::core_schema().unwrap());
        registry.register(stock::user_schema().unwrap());
        registry
    }

    #[test]
    fn test_resolve_flattens_core_and_primary_attributes() {
        let registry = loaded_registry();
        let rt = stock::user_resource_type().unwrap();
        let root = registry.resolve(&rt).unwrap();

        assert_eq!(root.name(), "User");
        // core schema
        assert!(root.sub_attribute("schemas").is_some());
        assert!(root.sub_attribute("id").is_some());
        assert!(root.sub_attribute("meta").is_some());
        // primary schema
        assert!(root.sub_attribute("userName").is_some());
        assert!(root.sub_attribute("emails").is_some());
    }

    #[test]
    fn test_resolve_nests_extension_under_urn_container() {
        let mut registry = loaded_registry();
        registry.register(
            serde_json::from_value(serde_json::json!({
                "id": "urn:example:params:scim:schemas:extension:2.0:Badge",
                "name": "Badge",
                "attributes": [{"name": "badgeNumber"}]
            }))
            .unwrap(),
        );
        let rt: ResourceType = serde_json::from_value(serde_json::json!({
            "id": "User",
            "name": "User",
            "schema": "urn:ietf:params:scim:schemas:core:2.0:User",
            "schemaExtensions": [
                {"schema": "urn:example:params:scim:schemas:extension:2.0:Badge"}
            ]
        }))
        .unwrap();

        let root = registry.resolve(&rt).unwrap();
        let container = root
            .sub_attribute("urn:example:params:scim:schemas:extension:2.0:Badge")
            .expect("extension container");
        assert!(container.sub_attribute("badgeNumber").is_some());
    }

    #[test]
    fn test_resolve_without_core_schema_fails() {
        let mut registry = SchemaRegistry::new();
        registry.register(stock::user_schema().unwrap());
        let rt = stock::user_resource_type().unwrap();

        let err = registry.resolve(&rt).unwrap_err();
        assert_eq!(err.code(), "ERR_INTERNAL");
    }

    #[test]
    fn test_resolve_unregistered_primary_schema_fails() {
        let mut registry = SchemaRegistry::new();
        registry.register_core(stock::core_schema().unwrap());
        let rt = stock::user_resource_type().unwrap();

        let err = registry.resolve(&rt).unwrap_err();
        assert_eq!(err.code(), "ERR_INTERNAL");
    }
}
