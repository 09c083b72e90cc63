//! Bundled schema documents for the core User resource type
//!
//! Embedded copies of the RFC 7643 common attributes, the User schema, and
//! the User resource type, handy for wiring a registry without external
//! schema files.

use super::{ResourceType, Schema};
use crate::errors::Result;

const CORE_SCHEMA: &str = include_str!("stock/core_schema.json");
const USER_SCHEMA: &str = include_str!("stock/user_schema.json");
const USER_RESOURCE_TYPE: &str = include_str!("stock/user_resource_type.json");

/// Parse the bundled common core schema
pub fn core_schema() -> Result<Schema> {
    Ok(serde_json::from_str(CORE_SCHEMA)?)
}

/// Parse the bundled User schema
pub fn user_schema() -> Result<Schema> {
    Ok(serde_json::from_str(USER_SCHEMA)?)
}

/// Parse the bundled User resource type
pub fn user_resource_type() -> Result<ResourceType> {
    Ok(serde_json::from_str(USER_RESOURCE_TYPE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_documents_parse() {
        let core = core_schema().unwrap();
        assert_eq!(core.id(), "urn:ietf:params:scim:schemas:core:2.0:Common");

        let user = user_schema().unwrap();
        assert_eq!(user.id(), "urn:ietf:params:scim:schemas:core:2.0:User");
        assert!(user.attributes().iter().any(|a| a.name() == "emails"));

        let rt = user_resource_type().unwrap();
        assert_eq!(rt.schema(), user.id());
        assert_eq!(rt.endpoint(), "/Users");
    }

    #[test]
    fn test_user_schema_attribute_metadata() {
        let user = user_schema().unwrap();
        let password = user
            .attributes()
            .iter()
            .find(|a| a.name() == "password")
            .unwrap();
        assert_eq!(password.mutability(), crate::spec::Mutability::WriteOnly);
        assert_eq!(password.returned(), crate::spec::Returned::Never);

        let groups = user
            .attributes()
            .iter()
            .find(|a| a.name() == "groups")
            .unwrap();
        assert_eq!(groups.mutability(), crate::spec::Mutability::ReadOnly);
        assert!(groups.multi_valued());
    }
}
