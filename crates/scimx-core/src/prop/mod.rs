//! Typed property trees
//!
//! A resource is held as a tree of properties, each bound to the attribute
//! definition that governs it. The tree is fully materialized against the
//! schema: complex properties always carry one sub-property per declared
//! sub-attribute, in declared order, whether or not a value is assigned.

mod navigate;
mod property;
mod resource;

pub use navigate::Navigator;
pub use property::{Property, PropertyValue, ScalarValue};
pub use resource::Resource;
