//! In-memory resource store
//!
//! A mutex-guarded map keyed by resource id. Holding the lock across the
//! version comparison and the overwrite is what makes `replace` an atomic
//! compare-and-swap.

#![allow(clippy::result_large_err)]

use crate::db::{Db, Projection};
use crate::errors::{
    cancelled, duplicate_id, lock_poisoned, not_found, version_conflict, Result,
};
use scimx_core::errors::{ScimError, ScimErrorKind};
use scimx_core::prop::Resource;
use scimx_core_types::RequestContext;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory `Db` implementation
#[derive(Debug, Default)]
pub struct MemoryDb {
    items: Mutex<HashMap<String, Resource>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, HashMap<String, Resource>>> {
        self.items.lock().map_err(|_| lock_poisoned(op))
    }
}

impl Db for MemoryDb {
    fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
        _projection: Option<&Projection>,
    ) -> Result<Resource> {
        if ctx.is_cancelled() {
            return Err(cancelled("get"));
        }
        let items = self.lock("get")?;
        let resource = items.get(id).cloned().ok_or_else(|| not_found(id))?;
        tracing::debug!(resource_id = id, "fetched resource");
        Ok(resource)
    }

    fn insert(&self, ctx: &RequestContext, resource: &Resource) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(cancelled("insert"));
        }
        let id = resource.id_or_empty();
        if id.is_empty() {
            return Err(ScimError::new(ScimErrorKind::InvalidValue)
                .with_op("insert")
                .with_message("resource has no id"));
        }
        let mut items = self.lock("insert")?;
        if items.contains_key(id) {
            return Err(duplicate_id(id));
        }
        items.insert(id.to_string(), resource.clone());
        tracing::debug!(resource_id = id, "inserted resource");
        Ok(())
    }

    fn replace(
        &self,
        ctx: &RequestContext,
        pre_image: &Resource,
        resource: &Resource,
    ) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(cancelled("replace"));
        }
        let id = pre_image.id_or_empty();
        let mut items = self.lock("replace")?;
        let stored = items.get(id).ok_or_else(|| not_found(id))?;
        if stored.version_or_empty() != pre_image.version_or_empty() {
            return Err(version_conflict(id));
        }
        items.insert(id.to_string(), resource.clone());
        tracing::debug!(resource_id = id, "replaced resource");
        Ok(())
    }

    fn count(&self, ctx: &RequestContext) -> Result<usize> {
        if ctx.is_cancelled() {
            return Err(cancelled("count"));
        }
        Ok(self.lock("count")?.len())
    }
}
