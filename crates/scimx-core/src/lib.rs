//! scimx core - schema-typed SCIM resource kernel
//!
//! This crate provides the foundational data structures and operations for
//! scimx, including:
//! - Schema metadata model (attributes, schemas, resource types, registry)
//! - Schema-bound property trees with deep clone and unassigned semantics
//! - SCIM path expression compiler with filter support
//! - Typed JSON (de)serialization against attribute metadata
//! - Add/replace/remove mutation semantics with mutability enforcement
//! - Content fingerprints for version tokens and no-op detection

pub mod crud;
pub mod digest;
pub mod errors;
pub mod expr;
pub mod json;
pub mod logging_facility;
pub mod prop;
pub mod spec;

// Re-export commonly used types
pub use errors::{Result, ScimError, ScimErrorKind};
pub use prop::{Property, PropertyValue, Resource, ScalarValue};
pub use spec::{
    Attribute, Mutability, ResourceType, Schema, SchemaRegistry, ServiceProviderConfig, Type,
    Uniqueness,
};
