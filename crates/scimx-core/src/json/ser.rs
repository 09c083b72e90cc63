use crate::errors::{Result, ScimError, ScimErrorKind};
use crate::prop::{Property, PropertyValue, Resource, ScalarValue};
use serde_json::{Map, Number, Value};

/// Serialize a property to JSON
///
/// Unassigned properties serialize to `None` so they vanish from the
/// output rather than appearing as nulls; a complex property whose
/// sub-properties are all unassigned vanishes the same way. Object keys
/// come out sorted, which keeps the serialization canonical.
pub fn serialize_property(property: &Property) -> Result<Option<Value>> {
    match property.value() {
        PropertyValue::Unassigned => Ok(None),
        PropertyValue::Scalar(scalar) => Ok(Some(serialize_scalar(scalar)?)),
        PropertyValue::Complex(children) => {
            let mut object = Map::new();
            for child in children {
                if let Some(value) = serialize_property(child)? {
                    object.insert(child.attribute().name().to_string(), value);
                }
            }
            if object.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Value::Object(object)))
            }
        }
        PropertyValue::Multi(elements) => {
            let mut array = Vec::new();
            for element in elements {
                if let Some(value) = serialize_property(element)? {
                    array.push(value);
                }
            }
            if array.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Value::Array(array)))
            }
        }
    }
}

/// Serialize a whole resource to a JSON object
pub fn serialize_resource(resource: &Resource) -> Result<Value> {
    Ok(serialize_property(resource.root())?.unwrap_or_else(|| Value::Object(Map::new())))
}

fn serialize_scalar(scalar: &ScalarValue) -> Result<Value> {
    match scalar {
        ScalarValue::Str(s)
        | ScalarValue::DateTime(s)
        | ScalarValue::Reference(s)
        | ScalarValue::Binary(s) => Ok(Value::String(s.clone())),
        ScalarValue::Bool(b) => Ok(Value::Bool(*b)),
        ScalarValue::Int(i) => Ok(Value::Number(Number::from(*i))),
        ScalarValue::Dec(d) => Number::from_f64(*d).map(Value::Number).ok_or_else(|| {
            ScimError::new(ScimErrorKind::Internal)
                .with_message("non-finite decimal value cannot be serialized")
        }),
    }
}
