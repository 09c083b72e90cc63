//! Storage port consumed by the patch orchestrator

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use scimx_core::prop::Resource;
use scimx_core_types::RequestContext;
use serde::Deserialize;

/// Attribute projection requested by a caller
///
/// Carried on `get` so implementations backed by an index can trim the
/// fetched resource. The in-memory store returns resources whole and
/// ignores it; the patch flow always fetches without a projection because
/// mutation needs the full tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub excluded_attributes: Vec<String>,
}

/// Resource storage with optimistic concurrency
///
/// `replace` is the commit point of the patch flow: it must atomically
/// verify that the stored resource's version still equals the pre-image's
/// version and fail with a conflict otherwise. Implementations must not
/// silently overwrite a concurrent change.
pub trait Db: Send + Sync {
    /// Fetch a resource by id
    ///
    /// # Errors
    /// `NotFound` when no resource has the given id.
    fn get(&self, ctx: &RequestContext, id: &str, projection: Option<&Projection>)
        -> Result<Resource>;

    /// Store a new resource
    ///
    /// # Errors
    /// `Conflict` when a resource with the same id already exists,
    /// `InvalidValue` when the resource carries no id.
    fn insert(&self, ctx: &RequestContext, resource: &Resource) -> Result<()>;

    /// Overwrite a stored resource if its version still matches the pre-image
    ///
    /// # Errors
    /// `Conflict` when the stored version no longer equals the pre-image's
    /// version, `NotFound` when the resource disappeared entirely.
    fn replace(
        &self,
        ctx: &RequestContext,
        pre_image: &Resource,
        resource: &Resource,
    ) -> Result<()>;

    /// Number of stored resources
    fn count(&self, ctx: &RequestContext) -> Result<usize>;
}
