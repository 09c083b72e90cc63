//! Schema metadata model
//!
//! Immutable attribute definitions parsed from SCIM schema documents, plus
//! the registry that composes a resource type's root attribute out of the
//! common attributes and its primary schema. Attribute handles are shared
//! by reference count; property trees never copy metadata.

mod attribute;
mod config;
mod registry;
mod resource_type;
mod schema;
pub mod stock;

pub use attribute::{Attribute, Mutability, Returned, Type, Uniqueness};
pub use config::{Capability, ServiceProviderConfig};
pub use registry::SchemaRegistry;
pub use resource_type::{ResourceType, SchemaExtension};
pub use schema::Schema;
