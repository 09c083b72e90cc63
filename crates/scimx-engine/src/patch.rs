//! Patch orchestration with a validate/filter/mutate/commit pipeline.
//!
//! ## Request pipeline (in order):
//! 1. Capability check (hard stop, no storage access)
//! 2. Payload read + validation (message URN, per-operation shape)
//! 3. Fetch resource (NotFound surfaces from store)
//! 4. Precondition check (optimistic-concurrency criteria)
//! 5. Pre-image snapshot (never mutated afterwards)
//! 6. Pre-filters in registration order
//! 7. Apply operations in payload order
//! 8. Post-filters in registration order (metadata stamping)
//! 9. Version diff, then optimistic commit (Conflict surfaces from store)

#![allow(clippy::result_large_err)]

use crate::filter::ByResource;
use scimx_core::crud;
use scimx_core::errors::{Result, ScimError, ScimErrorKind};
use scimx_core::expr::compile_path;
use scimx_core::json::deserialize_property;
use scimx_core::prop::Resource;
use scimx_core::spec::ServiceProviderConfig;
use scimx_core::{log_op_end, log_op_error, log_op_start};
use scimx_core_types::RequestContext;
use scimx_store::Db;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::io::Read;
use std::sync::Arc;

/// Well-known URN identifying a patch message payload
pub const PATCH_OP_URN: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// Wire form of a patch message
#[derive(Debug, Deserialize)]
pub struct PatchPayload {
    #[serde(default)]
    pub schemas: Vec<String>,
    /// The protocol capitalizes this field name on the wire
    #[serde(rename = "Operations", default)]
    pub operations: Vec<PatchOperation>,
}

/// One declarative operation within a patch message
#[derive(Debug, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    #[serde(default)]
    pub path: String,
    /// Captured raw and deserialized lazily against the resolved target
    /// attribute, not eagerly parsed into a generic tree
    pub value: Option<Box<RawValue>>,
}

/// Patch request addressed at one stored resource
pub struct PatchRequest<R: Read> {
    /// Identifier of the resource to patch
    pub resource_id: String,
    /// Optional precondition evaluated against the freshly fetched resource.
    /// Only consulted when optimistic-concurrency support is enabled.
    pub match_criteria: Option<Box<dyn Fn(&Resource) -> bool>>,
    /// Readable stream supplying the JSON payload
    pub payload_source: R,
}

/// Outcome of a patch request
#[derive(Debug, Clone)]
pub struct PatchResponse {
    /// Whether a change was committed
    pub patched: bool,
    /// Post-commit resource when patched, otherwise the pre-image
    pub resource: Resource,
    /// Version token that was current before this call
    pub old_version: String,
}

/// Patch orchestration service
///
/// Owns the capability configuration, the storage port, and the ordered
/// filter chains. One instance serves many concurrent requests; per-request
/// state lives on the stack. Register [`crate::filter::MetaFilter`] as a
/// post-filter so content changes move the version token; without it every
/// request diffs as a no-op.
pub struct PatchService {
    config: Arc<ServiceProviderConfig>,
    database: Arc<dyn Db>,
    pre_filters: Vec<Box<dyn ByResource>>,
    post_filters: Vec<Box<dyn ByResource>>,
}

impl PatchService {
    pub fn new(config: Arc<ServiceProviderConfig>, database: Arc<dyn Db>) -> Self {
        Self {
            config,
            database,
            pre_filters: Vec::new(),
            post_filters: Vec::new(),
        }
    }

    /// Append a filter to the pre-mutation chain
    pub fn with_pre_filter(mut self, filter: Box<dyn ByResource>) -> Self {
        self.pre_filters.push(filter);
        self
    }

    /// Append a filter to the post-mutation chain
    pub fn with_post_filter(mut self, filter: Box<dyn ByResource>) -> Self {
        self.post_filters.push(filter);
        self
    }

    /// Apply a patch message to a stored resource — CANONICAL entry point.
    ///
    /// Runs the full request pipeline (capability check → payload validation
    /// → fetch → precondition → filters → mutation → optimistic commit).
    ///
    /// ## Arguments
    /// - `ctx`: Cancellation-aware call context threaded to payload read and
    ///   storage calls
    /// - `request`: resource id, optional match criteria, payload stream
    pub fn patch<R: Read>(
        &self,
        ctx: &RequestContext,
        request: PatchRequest<R>,
    ) -> Result<PatchResponse> {
        log_op_start!(
            "patch",
            resource_id = %request.resource_id,
            request_id = %ctx.request_id
        );
        let start = std::time::Instant::now();

        let response = self.run(ctx, request).map_err(|e| {
            log_op_error!(
                "patch",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "patch",
            duration_ms = start.elapsed().as_millis() as u64,
            patched = response.patched
        );
        Ok(response)
    }

    fn run<R: Read>(&self, ctx: &RequestContext, request: PatchRequest<R>) -> Result<PatchResponse> {
        // Step 1: Capability check (hard stop, no storage access)
        if !self.config.patch.supported {
            return Err(ScimError::new(ScimErrorKind::Unsupported)
                .with_op("patch")
                .with_message("patch operation is not supported"));
        }

        // Step 2: Read and validate the payload before touching storage
        let payload = read_payload(ctx, request.payload_source)?;
        validate_payload(&payload)?;

        // Step 3: Fetch (NotFound propagates unchanged from the store)
        let mut resource = self.database.get(ctx, &request.resource_id, None)?;

        // Step 4: Precondition check
        if self.config.etag.supported {
            if let Some(criteria) = &request.match_criteria {
                if !criteria(&resource) {
                    return Err(ScimError::new(ScimErrorKind::Conflict)
                        .with_op("patch")
                        .with_resource_id(request.resource_id.as_str())
                        .with_message("resource does not meet precondition"));
                }
            }
        }

        // Step 5: Snapshot the pre-image; never mutated from here on
        let pre_image = resource.clone();
        let old_version = pre_image.version_or_empty().to_string();

        // Step 6: Pre-filters in registration order
        for filter in &self.pre_filters {
            filter.filter_ref(ctx, &mut resource, &pre_image)?;
        }

        // Step 7: Apply operations in payload order; later operations observe
        // the effects of earlier ones
        for operation in &payload.operations {
            self.apply(&mut resource, operation)?;
        }

        // Step 8: Post-filters in registration order (metadata stamping)
        for filter in &self.post_filters {
            filter.filter_ref(ctx, &mut resource, &pre_image)?;
        }

        // Step 9: Version diff, then optimistic commit. An unchanged version
        // means no net effect: the mutation attempt is discarded and the
        // pre-image returned.
        if resource.version_or_empty() == pre_image.version_or_empty() {
            return Ok(PatchResponse {
                patched: false,
                resource: pre_image,
                old_version,
            });
        }
        self.database.replace(ctx, &pre_image, &resource)?;
        Ok(PatchResponse {
            patched: true,
            resource,
            old_version,
        })
    }

    fn apply(&self, resource: &mut Resource, operation: &PatchOperation) -> Result<()> {
        let expr = compile_path(&operation.path).map_err(|e| {
            ScimError::from(e)
                .with_op("patch")
                .with_path(operation.path.as_str())
        })?;
        // fully-qualified paths may lead with the resource type identifier
        let expr = expr.strip_prefix(resource.resource_type().id());

        match operation.op.as_str() {
            "add" | "replace" => {
                let raw = match operation.value.as_deref() {
                    Some(raw) => raw,
                    None => {
                        return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                            .with_op("patch")
                            .with_message(format!("no value for {} operation", operation.op)))
                    }
                };
                let attr = crud::value_attribute(&resource.root_attribute(), &expr)
                    .map_err(|e| e.with_path(operation.path.as_str()))?;
                let json: serde_json::Value = serde_json::from_str(raw.get())?;
                let value = deserialize_property(&attr, &json, operation.op == "add")
                    .map_err(|e| e.with_path(operation.path.as_str()))?;
                if operation.op == "add" {
                    crud::add(resource, &expr, value)
                        .map_err(|e| e.with_path(operation.path.as_str()))
                } else {
                    crud::replace(resource, &expr, value)
                        .map_err(|e| e.with_path(operation.path.as_str()))
                }
            }
            "remove" => {
                crud::delete(resource, &expr).map_err(|e| e.with_path(operation.path.as_str()))
            }
            other => Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                .with_op("patch")
                .with_message(format!("invalid patch operation '{}'", other))),
        }
    }
}

/// Read the payload stream to its end and parse the patch message
fn read_payload<R: Read>(ctx: &RequestContext, mut source: R) -> Result<PatchPayload> {
    if ctx.is_cancelled() {
        return Err(ScimError::new(ScimErrorKind::Internal)
            .with_op("patch")
            .with_message("request cancelled before payload read"));
    }
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer).map_err(|e| {
        ScimError::new(ScimErrorKind::InvalidSyntax)
            .with_op("patch")
            .with_message(format!("failed to read request body: {}", e))
    })?;
    let payload: PatchPayload = serde_json::from_slice(&buffer)?;
    Ok(payload)
}

/// Validate message identity and per-operation shape before any storage access
fn validate_payload(payload: &PatchPayload) -> Result<()> {
    // exactly one schemas entry, and it must be the PatchOp URN
    let schema_ok = payload.schemas.len() == 1
        && payload.schemas.first().map(String::as_str) == Some(PATCH_OP_URN);
    if !schema_ok {
        return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
            .with_op("patch")
            .with_message("invalid patch operation schema"));
    }
    for operation in &payload.operations {
        match operation.op.as_str() {
            "add" | "replace" => {
                if operation.value.is_none() {
                    return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                        .with_op("patch")
                        .with_message(format!("no value for {} operation", operation.op)));
                }
            }
            "remove" => {
                if operation.path.is_empty() {
                    return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                        .with_op("patch")
                        .with_message("no path for remove operation"));
                }
                if operation.value.is_some() {
                    return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                        .with_op("patch")
                        .with_message("value is unnecessary for remove operation"));
                }
            }
            other => {
                return Err(ScimError::new(ScimErrorKind::InvalidSyntax)
                    .with_op("patch")
                    .with_message(format!("invalid patch operation '{}'", other)));
            }
        }
    }
    Ok(())
}
