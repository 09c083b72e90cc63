use super::{Navigator, Property, PropertyValue};
use crate::spec::{Attribute, ResourceType};
use std::sync::Arc;

/// A materialized SCIM resource
///
/// Owns the typed property tree rooted at the resource type's composed
/// attribute. Cloning is deep for values; attribute metadata handles stay
/// shared.
#[derive(Debug, Clone)]
pub struct Resource {
    resource_type: Arc<ResourceType>,
    root: Property,
}

impl Resource {
    /// Create an empty resource of the given type
    pub fn new(resource_type: Arc<ResourceType>, root_attribute: Arc<Attribute>) -> Self {
        Resource {
            resource_type,
            root: Property::new(root_attribute),
        }
    }

    pub(crate) fn from_parts(resource_type: Arc<ResourceType>, root: Property) -> Self {
        Resource {
            resource_type,
            root,
        }
    }

    /// Get the resource type
    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    /// Get the root property
    pub fn root(&self) -> &Property {
        &self.root
    }

    /// Get the root property mutably
    pub fn root_mut(&mut self) -> &mut Property {
        &mut self.root
    }

    /// Get the composed root attribute
    pub fn root_attribute(&self) -> Arc<Attribute> {
        self.root.attribute().clone()
    }

    /// Get the resource id, or the empty string when unassigned
    pub fn id_or_empty(&self) -> &str {
        scalar_str(self.root.sub("id"))
    }

    /// Get the stored version token, or the empty string when unassigned
    pub fn version_or_empty(&self) -> &str {
        scalar_str(self.root.sub("meta").and_then(|meta| meta.sub("version")))
    }

    /// Start navigating the property tree from the root
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.root)
    }
}

fn scalar_str(property: Option<&Property>) -> &str {
    match property.map(Property::value) {
        Some(PropertyValue::Scalar(value)) => value.as_str().unwrap_or(""),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::deserialize_resource;
    use crate::spec::{stock, SchemaRegistry};

    fn user_root() -> (Arc<ResourceType>, Arc<Attribute>) {
        let mut registry = SchemaRegistry::new();
        registry.register_core(stock::core_schema().unwrap());
        registry.register(stock::user_schema().unwrap());
        let resource_type = Arc::new(stock::user_resource_type().unwrap());
        let root = registry.resolve(&resource_type).unwrap();
        (resource_type, root)
    }

    #[test]
    fn test_empty_resource_accessors() {
        let (resource_type, root) = user_root();
        let resource = Resource::new(resource_type, root);
        assert_eq!(resource.id_or_empty(), "");
        assert_eq!(resource.version_or_empty(), "");
    }

    #[test]
    fn test_id_and_version_accessors() {
        let (resource_type, root) = user_root();
        let resource = deserialize_resource(
            resource_type,
            root,
            &serde_json::json!({
                "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
                "id": "foo",
                "userName": "foo",
                "meta": {"version": "W/\"1\""}
            }),
        )
        .unwrap();

        assert_eq!(resource.id_or_empty(), "foo");
        assert_eq!(resource.version_or_empty(), "W/\"1\"");
        assert_eq!(resource.resource_type().id(), "User");
    }
}
