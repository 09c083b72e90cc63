use crate::errors::{Result, ScimError, ScimErrorKind};
use crate::prop::{Property, Resource, ScalarValue};
use crate::spec::{Attribute, ResourceType, Type};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use std::sync::Arc;

/// Deserialize a raw JSON value against an attribute definition
///
/// In lenient mode a single JSON object or scalar is accepted where a
/// multi-valued attribute expects an array and is wrapped as one element;
/// strict mode rejects it. Lenient mode serves the add operation, which
/// merges partial values; replace and full-resource deserialization are
/// strict. A JSON null deserializes to the unassigned property.
pub fn deserialize_property(
    attr: &Arc<Attribute>,
    value: &Value,
    lenient: bool,
) -> Result<Property> {
    if value.is_null() {
        return Ok(Property::new(attr.clone()));
    }
    if attr.multi_valued() {
        return deserialize_multi(attr, value, lenient);
    }
    match attr.typ() {
        Type::Complex => deserialize_complex(attr, value, lenient),
        _ => deserialize_scalar(attr, value),
    }
}

/// Deserialize a full resource document
pub fn deserialize_resource(
    resource_type: Arc<ResourceType>,
    root_attribute: Arc<Attribute>,
    value: &Value,
) -> Result<Resource> {
    if !value.is_object() {
        return Err(ScimError::new(ScimErrorKind::InvalidValue)
            .with_message("a resource must be a JSON object"));
    }
    let root = deserialize_property(&root_attribute, value, false)?;
    Ok(Resource::from_parts(resource_type, root))
}

fn deserialize_multi(attr: &Arc<Attribute>, value: &Value, lenient: bool) -> Result<Property> {
    let element_attr = attr.element_attribute().cloned().ok_or_else(|| {
        ScimError::new(ScimErrorKind::Internal).with_message(format!(
            "attribute '{}' has no element definition",
            attr.name()
        ))
    })?;

    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        _ if lenient => vec![value],
        _ => return Err(type_mismatch(attr, "a JSON array")),
    };

    let mut property = Property::new(attr.clone());
    for item in items {
        if item.is_null() {
            return Err(ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
                "null element for attribute '{}'",
                attr.name()
            )));
        }
        let element = deserialize_property(&element_attr, item, lenient)?;
        property.append_element(element)?;
    }
    Ok(property)
}

fn deserialize_complex(attr: &Arc<Attribute>, value: &Value, lenient: bool) -> Result<Property> {
    let object = value
        .as_object()
        .ok_or_else(|| type_mismatch(attr, "a JSON object"))?;

    let mut property = Property::new(attr.clone());
    for (key, item) in object {
        let sub_attr = attr.sub_attribute(key).cloned().ok_or_else(|| {
            ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
                "undefined sub-attribute '{}' of attribute '{}'",
                key,
                attr.name()
            ))
        })?;
        let child = deserialize_property(&sub_attr, item, lenient)?;
        let slot = property.sub_mut(key).ok_or_else(|| {
            ScimError::new(ScimErrorKind::Internal)
                .with_message(format!("no slot for sub-attribute '{}'", key))
        })?;
        *slot = child;
    }
    Ok(property)
}

fn deserialize_scalar(attr: &Arc<Attribute>, value: &Value) -> Result<Property> {
    let scalar = match attr.typ() {
        Type::String => ScalarValue::Str(expect_str(attr, value, "a string")?.to_string()),
        Type::Boolean => {
            ScalarValue::Bool(value.as_bool().ok_or_else(|| type_mismatch(attr, "a boolean"))?)
        }
        Type::Integer => {
            ScalarValue::Int(value.as_i64().ok_or_else(|| type_mismatch(attr, "an integer"))?)
        }
        Type::Decimal => {
            ScalarValue::Dec(value.as_f64().ok_or_else(|| type_mismatch(attr, "a number"))?)
        }
        Type::DateTime => {
            let text = expect_str(attr, value, "an RFC 3339 timestamp")?;
            chrono::DateTime::parse_from_rfc3339(text).map_err(|_| {
                ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
                    "invalid timestamp for attribute '{}'",
                    attr.name()
                ))
            })?;
            ScalarValue::DateTime(text.to_string())
        }
        Type::Reference => {
            ScalarValue::Reference(expect_str(attr, value, "a reference string")?.to_string())
        }
        Type::Binary => {
            let text = expect_str(attr, value, "base64 text")?;
            STANDARD.decode(text).map_err(|_| {
                ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
                    "invalid base64 content for attribute '{}'",
                    attr.name()
                ))
            })?;
            ScalarValue::Binary(text.to_string())
        }
        Type::Complex => {
            return Err(ScimError::new(ScimErrorKind::Internal).with_message(format!(
                "attribute '{}' is complex, not scalar",
                attr.name()
            )))
        }
    };

    let mut property = Property::new(attr.clone());
    property.set_scalar(scalar)?;
    Ok(property)
}

fn expect_str<'v>(attr: &Attribute, value: &'v Value, expected: &str) -> Result<&'v str> {
    value.as_str().ok_or_else(|| type_mismatch(attr, expected))
}

fn type_mismatch(attr: &Attribute, expected: &str) -> ScimError {
    ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
        "expected {} for attribute '{}'",
        expected,
        attr.name()
    ))
}
