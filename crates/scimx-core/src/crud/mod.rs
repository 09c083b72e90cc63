//! Mutations over property trees
//!
//! The three patch verbs operate here: `add` merges, `replace` overwrites,
//! `delete` unassigns. Targets are selected by walking a compiled path
//! against the live tree, narrowing through value filters on the way.
//!
//! Mutability is enforced at the write site. A write that leaves the target
//! equal to its current value is always permitted, so idempotent syncs
//! replay cleanly against readOnly and immutable attributes.

mod eval;
mod resolve;

pub use resolve::{resolve_attribute, value_attribute};

use crate::errors::{Result, ScimError, ScimErrorKind};
use crate::expr::{PathExpr, Step};
use crate::prop::{Property, PropertyValue, Resource};
use crate::spec::{Mutability, Type};
use eval::matches;

/// Merge a value into the targets addressed by `expr`
///
/// Simple targets are overwritten, multi-valued targets grow by the new
/// elements, complex targets merge sub-attribute by sub-attribute. The
/// empty path merges into the resource root. A filter that matches no
/// element leaves the resource untouched.
pub fn add(resource: &mut Resource, expr: &PathExpr, value: Property) -> Result<()> {
    let targets = select_mut(resource.root_mut(), expr.steps())?;
    for target in targets {
        add_assign(target, value.clone())?;
    }
    Ok(())
}

/// Overwrite the targets addressed by `expr` with a value
///
/// Simple and multi-valued targets are replaced wholesale. Complex targets
/// have every provided sub-attribute overwritten and the rest untouched.
pub fn replace(resource: &mut Resource, expr: &PathExpr, value: Property) -> Result<()> {
    let targets = select_mut(resource.root_mut(), expr.steps())?;
    for target in targets {
        replace_assign(target, value.clone())?;
    }
    Ok(())
}

/// Unassign the targets addressed by `expr`
///
/// A trailing value filter deletes the matching elements from their
/// collection. Removing an attribute that is already unassigned is a
/// permitted no-op.
pub fn delete(resource: &mut Resource, expr: &PathExpr) -> Result<()> {
    let (last, parent_steps) = match expr.steps().split_last() {
        Some(split) => split,
        None => {
            return Err(ScimError::new(ScimErrorKind::InvalidPath)
                .with_message("remove requires a target path"))
        }
    };

    match last {
        Step::ValueFilter(filter) => {
            let collections = select_mut(resource.root_mut(), parent_steps)?;
            for collection in collections {
                if !collection.attribute().multi_valued() {
                    return Err(singular_filter(collection));
                }
                let any_match = collection
                    .elements()
                    .iter()
                    .any(|element| matches(filter, element));
                if !any_match {
                    continue;
                }
                match collection.attribute().mutability() {
                    Mutability::ReadOnly | Mutability::Immutable => {
                        return Err(mutability_violation(collection));
                    }
                    _ => {}
                }
                collection.retain_elements(|element| !matches(filter, element))?;
            }
        }
        Step::Attr(name) => {
            let parents = select_mut(resource.root_mut(), parent_steps)?;
            for parent in parents {
                if parent.attribute().multi_valued() {
                    if let Some(elements) = parent.elements_mut() {
                        for element in elements.iter_mut() {
                            let slot = element
                                .sub_mut(name)
                                .ok_or_else(|| undefined_attribute(name))?;
                            unassign_checked(slot)?;
                        }
                    }
                } else {
                    let slot = parent
                        .sub_mut(name)
                        .ok_or_else(|| undefined_attribute(name))?;
                    unassign_checked(slot)?;
                }
            }
        }
    }
    Ok(())
}

/// Walk `steps` from `root` and collect the addressed properties
///
/// An attribute step on a multi-valued property fans out into every
/// element. A filter step keeps the elements the filter matches; matching
/// nothing is not an error, the selection just comes back empty.
fn select_mut<'a>(root: &'a mut Property, steps: &[Step]) -> Result<Vec<&'a mut Property>> {
    let mut targets: Vec<&'a mut Property> = vec![root];
    for step in steps {
        let mut next: Vec<&'a mut Property> = Vec::new();
        match step {
            Step::Attr(name) => {
                for target in targets {
                    if target.attribute().multi_valued() {
                        if let Some(elements) = target.elements_mut() {
                            for element in elements.iter_mut() {
                                next.push(
                                    element
                                        .sub_mut(name)
                                        .ok_or_else(|| undefined_attribute(name))?,
                                );
                            }
                        }
                    } else {
                        next.push(
                            target
                                .sub_mut(name)
                                .ok_or_else(|| undefined_attribute(name))?,
                        );
                    }
                }
            }
            Step::ValueFilter(filter) => {
                for target in targets {
                    if !target.attribute().multi_valued() {
                        return Err(singular_filter(target));
                    }
                    if let Some(elements) = target.elements_mut() {
                        for element in elements.iter_mut() {
                            if matches(filter, &*element) {
                                next.push(element);
                            }
                        }
                    }
                }
            }
        }
        targets = next;
    }
    Ok(targets)
}

fn add_assign(target: &mut Property, incoming: Property) -> Result<()> {
    let attr = target.attribute().clone();
    if attr.multi_valued() {
        let elements = match incoming.into_value() {
            PropertyValue::Multi(elements) => elements,
            PropertyValue::Unassigned => Vec::new(),
            _ => return Err(shape_mismatch(target)),
        };
        if elements.is_empty() {
            return Ok(());
        }
        match attr.mutability() {
            Mutability::ReadOnly => return Err(mutability_violation(target)),
            Mutability::Immutable if !target.is_unassigned() => {
                return Err(mutability_violation(target));
            }
            _ => {}
        }
        for element in elements {
            target.append_element(element)?;
        }
        return Ok(());
    }

    if attr.typ() == Type::Complex {
        let children = match incoming.into_value() {
            PropertyValue::Complex(children) => children,
            PropertyValue::Unassigned => return Ok(()),
            _ => return Err(shape_mismatch(target)),
        };
        for child in children {
            if child.is_unassigned() {
                continue;
            }
            let name = child.attribute().name().to_string();
            let slot = target
                .sub_mut(&name)
                .ok_or_else(|| undefined_attribute(&name))?;
            add_assign(slot, child)?;
        }
        return Ok(());
    }

    ensure_overwrite(target, incoming.value())?;
    target.replace_value(incoming.into_value());
    Ok(())
}

fn replace_assign(target: &mut Property, incoming: Property) -> Result<()> {
    let attr = target.attribute().clone();
    if attr.multi_valued() || attr.typ() != Type::Complex {
        ensure_overwrite(target, incoming.value())?;
        target.replace_value(incoming.into_value());
        return Ok(());
    }

    let children = match incoming.into_value() {
        PropertyValue::Complex(children) => children,
        PropertyValue::Unassigned => return Ok(()),
        _ => return Err(shape_mismatch(target)),
    };
    for child in children {
        if child.is_unassigned() {
            continue;
        }
        let name = child.attribute().name().to_string();
        let slot = target
            .sub_mut(&name)
            .ok_or_else(|| undefined_attribute(&name))?;
        ensure_overwrite(slot, child.value())?;
        slot.replace_value(child.into_value());
    }
    Ok(())
}

fn unassign_checked(target: &mut Property) -> Result<()> {
    if target.is_unassigned() {
        return Ok(());
    }
    match target.attribute().mutability() {
        Mutability::ReadOnly | Mutability::Immutable => Err(mutability_violation(target)),
        _ => {
            target.unassign();
            Ok(())
        }
    }
}

fn ensure_overwrite(target: &Property, incoming: &PropertyValue) -> Result<()> {
    if target.value() == incoming {
        return Ok(());
    }
    match target.attribute().mutability() {
        Mutability::ReadOnly => Err(mutability_violation(target)),
        Mutability::Immutable if !target.is_unassigned() => Err(mutability_violation(target)),
        _ => Ok(()),
    }
}

fn mutability_violation(property: &Property) -> ScimError {
    ScimError::new(ScimErrorKind::InvalidValue).with_message(format!(
        "attribute '{}' is not modifiable (mutability)",
        property.attribute().name()
    ))
}

fn singular_filter(property: &Property) -> ScimError {
    ScimError::new(ScimErrorKind::InvalidPath).with_message(format!(
        "filter applied to singular attribute '{}'",
        property.attribute().name()
    ))
}

fn undefined_attribute(name: &str) -> ScimError {
    ScimError::new(ScimErrorKind::InvalidPath)
        .with_message(format!("attribute '{}' is not defined", name))
}

fn shape_mismatch(property: &Property) -> ScimError {
    ScimError::new(ScimErrorKind::Internal).with_message(format!(
        "value shape does not match attribute '{}'",
        property.attribute().name()
    ))
}
