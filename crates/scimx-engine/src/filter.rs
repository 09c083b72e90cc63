//! Resource filters around the mutation phase
//!
//! A filter sees the live resource next to its immutable pre-image and may
//! adjust or reject it. The orchestrator runs an ordered pre-list before
//! applying operations and an ordered post-list after; the first failing
//! filter aborts the request.

#![allow(clippy::result_large_err)]

use scimx_core::digest::{content_fingerprint, weak_etag};
use scimx_core::errors::{Result, ScimError, ScimErrorKind};
use scimx_core::prop::{Resource, ScalarValue};
use scimx_core_types::RequestContext;

/// Filter a resource given its pre-image
///
/// The pre-image must be treated as read-only; only the live resource may
/// be adjusted. Returning an error rejects the whole request with whatever
/// kind the filter raises.
pub trait ByResource: Send + Sync {
    fn filter_ref(
        &self,
        ctx: &RequestContext,
        resource: &mut Resource,
        pre_image: &Resource,
    ) -> Result<()>;
}

/// Post-filter that restamps resource metadata after a content change
///
/// Compares the live and pre-image content fingerprints (metadata is
/// excluded from both). When they differ, stamps `meta.resourceType` (only
/// if unassigned), `meta.lastModified`, and a weak-ETag `meta.version`
/// derived from the new fingerprint. Equal fingerprints leave the resource
/// untouched, so the orchestrator's no-op detection sees identical version
/// tokens.
#[derive(Debug, Default)]
pub struct MetaFilter;

impl MetaFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ByResource for MetaFilter {
    fn filter_ref(
        &self,
        _ctx: &RequestContext,
        resource: &mut Resource,
        pre_image: &Resource,
    ) -> Result<()> {
        let live = content_fingerprint(resource)?;
        let before = content_fingerprint(pre_image)?;
        if live == before {
            return Ok(());
        }
        stamp_meta(resource, &live)
    }
}

fn stamp_meta(resource: &mut Resource, fingerprint: &str) -> Result<()> {
    let type_name = resource.resource_type().name().to_string();
    let version = weak_etag(fingerprint);
    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let meta = resource
        .root_mut()
        .sub_mut("meta")
        .ok_or_else(missing_meta)?;

    let slot = meta.sub_mut("resourceType").ok_or_else(missing_meta)?;
    if slot.is_unassigned() {
        slot.set_scalar(ScalarValue::Str(type_name))?;
    }
    let slot = meta.sub_mut("lastModified").ok_or_else(missing_meta)?;
    slot.set_scalar(ScalarValue::DateTime(now))?;
    let slot = meta.sub_mut("version").ok_or_else(missing_meta)?;
    slot.set_scalar(ScalarValue::Str(version))?;
    Ok(())
}

fn missing_meta() -> ScimError {
    ScimError::new(ScimErrorKind::Internal)
        .with_op("meta_filter")
        .with_message("resource schema has no meta attribute")
}

/// Filter that rejects every request with a fixed error kind
///
/// Test support for wiring the pre/post chains.
#[derive(Debug, Clone, Copy)]
pub struct RejectAllFilter {
    kind: ScimErrorKind,
}

impl RejectAllFilter {
    pub fn new(kind: ScimErrorKind) -> Self {
        Self { kind }
    }
}

impl ByResource for RejectAllFilter {
    fn filter_ref(
        &self,
        _ctx: &RequestContext,
        _resource: &mut Resource,
        _pre_image: &Resource,
    ) -> Result<()> {
        Err(ScimError::new(self.kind)
            .with_op("reject_all_filter")
            .with_message("rejected by filter"))
    }
}
