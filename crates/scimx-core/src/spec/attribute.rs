use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// SCIM attribute data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Type {
    #[default]
    String,
    Boolean,
    Integer,
    Decimal,
    DateTime,
    Reference,
    Binary,
    Complex,
}

impl Type {
    /// Get the SCIM name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Boolean => "boolean",
            Type::Integer => "integer",
            Type::Decimal => "decimal",
            Type::DateTime => "dateTime",
            Type::Reference => "reference",
            Type::Binary => "binary",
            Type::Complex => "complex",
        }
    }
}

/// SCIM attribute mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    #[default]
    ReadWrite,
    ReadOnly,
    Immutable,
    WriteOnly,
}

/// SCIM attribute return policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    #[default]
    Default,
    Always,
    Never,
    Request,
}

/// SCIM attribute uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    #[default]
    None,
    Server,
    Global,
}

/// Immutable attribute definition
///
/// Parsed from a SCIM schema document and sealed on construction: a
/// case-insensitive sub-attribute index is built once, and multi-valued
/// attributes derive the singular attribute their elements are bound to.
/// Handles are shared via `Arc`; a property tree never owns its metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawAttribute")]
pub struct Attribute {
    name: String,
    typ: Type,
    description: String,
    multi_valued: bool,
    required: bool,
    case_exact: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    canonical_values: Vec<String>,
    sub_attributes: Vec<Arc<Attribute>>,
    // sealed lookup state
    sub_index: HashMap<String, usize>,
    element: Option<Arc<Attribute>>,
}

/// Wire shape of an attribute inside a schema document, before sealing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttribute {
    name: String,
    #[serde(rename = "type", default)]
    typ: Type,
    #[serde(default)]
    description: String,
    #[serde(default)]
    multi_valued: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    case_exact: bool,
    #[serde(default)]
    mutability: Mutability,
    #[serde(default)]
    returned: Returned,
    #[serde(default)]
    uniqueness: Uniqueness,
    #[serde(default)]
    canonical_values: Vec<String>,
    #[serde(default)]
    sub_attributes: Vec<RawAttribute>,
}

impl From<RawAttribute> for Attribute {
    fn from(raw: RawAttribute) -> Self {
        let sub_attributes: Vec<Arc<Attribute>> = raw
            .sub_attributes
            .into_iter()
            .map(|sub| Arc::new(Attribute::from(sub)))
            .collect();
        let sub_index = index_of(&sub_attributes);

        let element = if raw.multi_valued {
            Some(Arc::new(Attribute {
                name: raw.name.clone(),
                typ: raw.typ,
                description: raw.description.clone(),
                multi_valued: false,
                required: false,
                case_exact: raw.case_exact,
                mutability: raw.mutability,
                returned: raw.returned,
                uniqueness: Uniqueness::None,
                canonical_values: raw.canonical_values.clone(),
                sub_attributes: sub_attributes.clone(),
                sub_index: sub_index.clone(),
                element: None,
            }))
        } else {
            None
        };

        Attribute {
            name: raw.name,
            typ: raw.typ,
            description: raw.description,
            multi_valued: raw.multi_valued,
            required: raw.required,
            case_exact: raw.case_exact,
            mutability: raw.mutability,
            returned: raw.returned,
            uniqueness: raw.uniqueness,
            canonical_values: raw.canonical_values,
            sub_attributes,
            sub_index,
            element,
        }
    }
}

fn index_of(subs: &[Arc<Attribute>]) -> HashMap<String, usize> {
    subs.iter()
        .enumerate()
        .map(|(position, attr)| (attr.name.to_lowercase(), position))
        .collect()
}

impl Attribute {
    /// Build a complex container attribute (resource type roots, schema
    /// extension containers)
    pub(crate) fn container(
        name: impl Into<String>,
        required: bool,
        sub_attributes: Vec<Arc<Attribute>>,
    ) -> Self {
        let sub_index = index_of(&sub_attributes);
        Attribute {
            name: name.into(),
            typ: Type::Complex,
            description: String::new(),
            multi_valued: false,
            required,
            case_exact: false,
            mutability: Mutability::ReadWrite,
            returned: Returned::Default,
            uniqueness: Uniqueness::None,
            canonical_values: Vec::new(),
            sub_attributes,
            sub_index,
            element: None,
        }
    }

    /// Get the attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the attribute data type
    pub fn typ(&self) -> Type {
        self.typ
    }

    /// Get the attribute description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check whether the attribute is multi-valued
    pub fn multi_valued(&self) -> bool {
        self.multi_valued
    }

    /// Check whether the attribute is required
    pub fn required(&self) -> bool {
        self.required
    }

    /// Check whether string comparisons are case sensitive
    pub fn case_exact(&self) -> bool {
        self.case_exact
    }

    /// Get the attribute mutability
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    /// Get the attribute return policy
    pub fn returned(&self) -> Returned {
        self.returned
    }

    /// Get the attribute uniqueness constraint
    pub fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    /// Get the declared canonical values, if any
    pub fn canonical_values(&self) -> &[String] {
        &self.canonical_values
    }

    /// Get the declared sub-attributes in declaration order
    pub fn sub_attributes(&self) -> &[Arc<Attribute>] {
        &self.sub_attributes
    }

    /// Look up a sub-attribute by name, case-insensitively
    pub fn sub_attribute(&self, name: &str) -> Option<&Arc<Attribute>> {
        self.sub_index
            .get(&name.to_lowercase())
            .map(|position| &self.sub_attributes[*position])
    }

    /// Get the position of a sub-attribute within the declared order
    pub(crate) fn sub_position(&self, name: &str) -> Option<usize> {
        self.sub_index.get(&name.to_lowercase()).copied()
    }

    /// Get the derived singular attribute that elements of a multi-valued
    /// attribute are bound to
    pub fn element_attribute(&self) -> Option<&Arc<Attribute>> {
        self.element.as_ref()
    }
}
