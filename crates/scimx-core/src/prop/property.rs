use crate::errors::{Result, ScimError, ScimErrorKind};
use crate::spec::{Attribute, Type};
use std::sync::Arc;

/// A single typed scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Dec(f64),
    /// RFC 3339 timestamp, kept in its wire form
    DateTime(String),
    Reference(String),
    /// Base64 text, validated when decoded from JSON
    Binary(String),
}

impl ScalarValue {
    /// Get the textual content of a string-backed variant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Str(s)
            | ScalarValue::DateTime(s)
            | ScalarValue::Reference(s)
            | ScalarValue::Binary(s) => Some(s),
            _ => None,
        }
    }
}

/// The value state of a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// No value assigned
    Unassigned,
    Scalar(ScalarValue),
    /// Sub-properties of a complex attribute, in declared order
    Complex(Vec<Property>),
    /// Elements of a multi-valued attribute
    Multi(Vec<Property>),
}

/// A value bound to the attribute definition that governs it
#[derive(Debug, Clone)]
pub struct Property {
    attr: Arc<Attribute>,
    value: PropertyValue,
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.attr.name() == other.attr.name() && self.value == other.value
    }
}

impl Property {
    /// Create an unassigned property for the given attribute
    ///
    /// Complex attributes materialize one sub-property per declared
    /// sub-attribute; multi-valued attributes start with no elements.
    pub fn new(attr: Arc<Attribute>) -> Self {
        let value = if attr.multi_valued() {
            PropertyValue::Multi(Vec::new())
        } else if attr.typ() == Type::Complex {
            PropertyValue::Complex(materialize(&attr))
        } else {
            PropertyValue::Unassigned
        };
        Property { attr, value }
    }

    pub(crate) fn with_value(attr: Arc<Attribute>, value: PropertyValue) -> Self {
        Property { attr, value }
    }

    /// Get the attribute this property is bound to
    pub fn attribute(&self) -> &Arc<Attribute> {
        &self.attr
    }

    /// Get the current value
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub(crate) fn into_value(self) -> PropertyValue {
        self.value
    }

    /// Check whether the property carries no value
    ///
    /// A complex property is unassigned when every sub-property is; a
    /// multi-valued property is unassigned when it has no elements.
    pub fn is_unassigned(&self) -> bool {
        match &self.value {
            PropertyValue::Unassigned => true,
            PropertyValue::Scalar(_) => false,
            PropertyValue::Complex(children) => children.iter().all(Property::is_unassigned),
            PropertyValue::Multi(elements) => elements.is_empty(),
        }
    }

    /// Get the sub-property with the given name, case-insensitively
    pub fn sub(&self, name: &str) -> Option<&Property> {
        let position = self.attr.sub_position(name)?;
        match &self.value {
            PropertyValue::Complex(children) => children.get(position),
            _ => None,
        }
    }

    /// Get the sub-property with the given name mutably
    pub fn sub_mut(&mut self, name: &str) -> Option<&mut Property> {
        let position = self.attr.sub_position(name)?;
        match &mut self.value {
            PropertyValue::Complex(children) => children.get_mut(position),
            _ => None,
        }
    }

    /// Get the elements of a multi-valued property
    ///
    /// Empty for anything that is not multi-valued.
    pub fn elements(&self) -> &[Property] {
        match &self.value {
            PropertyValue::Multi(elements) => elements,
            _ => &[],
        }
    }

    pub(crate) fn elements_mut(&mut self) -> Option<&mut Vec<Property>> {
        match &mut self.value {
            PropertyValue::Multi(elements) => Some(elements),
            _ => None,
        }
    }

    /// Assign a scalar value
    ///
    /// Only valid for singular, non-complex attributes.
    pub fn set_scalar(&mut self, value: ScalarValue) -> Result<()> {
        if self.attr.multi_valued() || self.attr.typ() == Type::Complex {
            return Err(not_scalar(&self.attr));
        }
        self.value = PropertyValue::Scalar(value);
        Ok(())
    }

    pub(crate) fn replace_value(&mut self, value: PropertyValue) {
        self.value = value;
    }

    /// Clear the value, restoring the unassigned state for this attribute
    pub fn unassign(&mut self) {
        self.value = if self.attr.multi_valued() {
            PropertyValue::Multi(Vec::new())
        } else if self.attr.typ() == Type::Complex {
            PropertyValue::Complex(materialize(&self.attr))
        } else {
            PropertyValue::Unassigned
        };
    }

    /// Append an element to a multi-valued property
    pub fn append_element(&mut self, element: Property) -> Result<()> {
        match &mut self.value {
            PropertyValue::Multi(elements) => {
                elements.push(element);
                Ok(())
            }
            _ => Err(not_multi(&self.attr)),
        }
    }

    /// Keep only the elements the predicate accepts
    pub fn retain_elements(&mut self, keep: impl FnMut(&Property) -> bool) -> Result<()> {
        match &mut self.value {
            PropertyValue::Multi(elements) => {
                elements.retain(keep);
                Ok(())
            }
            _ => Err(not_multi(&self.attr)),
        }
    }
}

fn materialize(attr: &Attribute) -> Vec<Property> {
    attr.sub_attributes()
        .iter()
        .map(|sub| Property::new(sub.clone()))
        .collect()
}

fn not_scalar(attr: &Attribute) -> ScimError {
    ScimError::new(ScimErrorKind::Internal).with_message(format!(
        "attribute '{}' does not take a scalar value",
        attr.name()
    ))
}

fn not_multi(attr: &Attribute) -> ScimError {
    ScimError::new(ScimErrorKind::Internal)
        .with_message(format!("attribute '{}' is not multi-valued", attr.name()))
}
