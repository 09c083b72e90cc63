use crate::errors::{Result, ScimError, ScimErrorKind};
use crate::expr::{PathExpr, Step};
use crate::spec::Attribute;
use std::sync::Arc;

/// Resolve a compiled path to the attribute definition it addresses
///
/// Walks the steps iteratively. Filter steps are skipped: a filter narrows
/// elements, not schema shape. The empty path resolves to the root.
///
/// # Errors
/// `InvalidPath` when a named step has no matching attribute definition.
pub fn resolve_attribute(root: &Arc<Attribute>, expr: &PathExpr) -> Result<Arc<Attribute>> {
    let mut current = root.clone();
    let mut cursor = expr.cursor();

    while let Some(step) = cursor.current() {
        match step {
            Step::ValueFilter(_) => {}
            Step::Attr(name) => {
                current = current.sub_attribute(name).cloned().ok_or_else(|| {
                    ScimError::new(ScimErrorKind::InvalidPath)
                        .with_message(format!("attribute '{}' is not defined", name))
                })?;
            }
        }
        cursor.advance();
    }

    Ok(current)
}

/// Resolve the attribute a patch value is typed against
///
/// A path ending in a value filter addresses elements of a multi-valued
/// attribute, so the value is typed against the element definition rather
/// than the collection.
pub fn value_attribute(root: &Arc<Attribute>, expr: &PathExpr) -> Result<Arc<Attribute>> {
    let attr = resolve_attribute(root, expr)?;
    if expr.ends_with_value_filter() {
        return attr.element_attribute().cloned().ok_or_else(|| {
            ScimError::new(ScimErrorKind::InvalidPath).with_message(format!(
                "filter applied to singular attribute '{}'",
                attr.name()
            ))
        });
    }
    Ok(attr)
}
