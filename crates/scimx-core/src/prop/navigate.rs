use super::Property;
use crate::errors::{ScimError, ScimErrorKind};

/// Read-only walker over a property tree
///
/// Steps chain by value and errors latch: after a failed step every
/// further step is a no-op and the first error is kept.
#[derive(Debug)]
pub struct Navigator<'a> {
    current: Option<&'a Property>,
    error: Option<ScimError>,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(root: &'a Property) -> Self {
        Navigator {
            current: Some(root),
            error: None,
        }
    }

    /// Step into the named sub-property
    pub fn dot(mut self, name: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.current.and_then(|property| property.sub(name)) {
            Some(next) => self.current = Some(next),
            None => {
                self.error = Some(
                    ScimError::new(ScimErrorKind::InvalidPath)
                        .with_message(format!("no sub-property named '{}'", name)),
                );
                self.current = None;
            }
        }
        self
    }

    /// Step into the element at the given index
    pub fn at(mut self, index: usize) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.current.and_then(|property| property.elements().get(index)) {
            Some(next) => self.current = Some(next),
            None => {
                self.error = Some(
                    ScimError::new(ScimErrorKind::InvalidPath)
                        .with_message(format!("no element at index {}", index)),
                );
                self.current = None;
            }
        }
        self
    }

    /// Get the property the walk landed on
    pub fn current(&self) -> Option<&'a Property> {
        self.current
    }

    /// Check whether any step failed
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get the latched error, if any
    pub fn error(&self) -> Option<&ScimError> {
        self.error.as_ref()
    }
}
