//! Typed JSON (de)serialization for property trees
//!
//! Deserialization is driven by attribute metadata, not by the JSON shape:
//! every raw value is checked against the declared type of the attribute it
//! lands on. Serialization is canonical (object keys sorted) so equal trees
//! always produce byte-equal JSON, which the content fingerprint relies on.

mod de;
mod ser;

pub use de::{deserialize_property, deserialize_resource};
pub use ser::{serialize_property, serialize_resource};
