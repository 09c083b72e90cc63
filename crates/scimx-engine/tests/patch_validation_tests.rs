// Integration tests for payload validation
// Malformed requests must be rejected with InvalidSyntax before any
// storage access; bad paths and values fail with their own kinds

use scimx_core::errors::ScimErrorKind;
use scimx_core::json::deserialize_resource;
use scimx_core::prop::Resource;
use scimx_core::spec::{stock, Capability, SchemaRegistry, ServiceProviderConfig};
use scimx_core_types::RequestContext;
use scimx_engine::filter::MetaFilter;
use scimx_engine::patch::{PatchRequest, PatchService, PATCH_OP_URN};
use scimx_store::{Db, MemoryDb};
use serde_json::{json, Value};
use std::io::{self, Cursor, Read};
use std::sync::Arc;

fn service_config(patch: bool, etag: bool) -> Arc<ServiceProviderConfig> {
    Arc::new(ServiceProviderConfig {
        patch: Capability { supported: patch },
        etag: Capability { supported: etag },
    })
}

fn build_user(value: Value) -> Resource {
    let mut registry = SchemaRegistry::new();
    registry.register_core(stock::core_schema().unwrap());
    registry.register(stock::user_schema().unwrap());
    let resource_type = Arc::new(stock::user_resource_type().unwrap());
    let root = registry.resolve(&resource_type).unwrap();
    deserialize_resource(resource_type, root, &value).unwrap()
}

fn seeded_db() -> (Arc<MemoryDb>, RequestContext) {
    let db = Arc::new(MemoryDb::new());
    let ctx = RequestContext::new();
    db.insert(
        &ctx,
        &build_user(json!({"id": "foo", "userName": "foo", "timezone": "Asia/Shanghai"})),
    )
    .unwrap();
    (db, ctx)
}

fn patch_service(db: Arc<MemoryDb>) -> PatchService {
    PatchService::new(service_config(true, true), db)
        .with_post_filter(Box::new(MetaFilter::new()))
}

fn patch_request(resource_id: &str, payload: Value) -> PatchRequest<Cursor<Vec<u8>>> {
    PatchRequest {
        resource_id: resource_id.to_string(),
        match_criteria: None,
        payload_source: Cursor::new(payload.to_string().into_bytes()),
    }
}

fn patch_payload(operations: Value) -> Value {
    json!({
        "schemas": [PATCH_OP_URN],
        "Operations": operations
    })
}

#[test]
fn test_disabled_patch_capability_is_unsupported() {
    let (db, ctx) = seeded_db();
    let service = PatchService::new(service_config(false, true), db);

    let payload = patch_payload(json!([{"op": "remove", "path": "timezone"}]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::Unsupported);
}

#[test]
fn test_wrong_schema_urn_is_rejected_before_storage() {
    // Given: An empty store, so any storage access would be NotFound
    let db = Arc::new(MemoryDb::new());
    let ctx = RequestContext::new();
    let service = patch_service(db);

    // When: The message carries the wrong schema URN
    let payload = json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:BulkRequest"],
        "Operations": [{"op": "remove", "path": "timezone"}]
    });
    let err = service
        .patch(&ctx, patch_request("missing", payload))
        .unwrap_err();

    // Then: Validation fails first; the store was never consulted
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
}

#[test]
fn test_multiple_schema_entries_are_rejected() {
    // exactly one entry is required even when the URN appears among them
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = json!({
        "schemas": [PATCH_OP_URN, PATCH_OP_URN],
        "Operations": [{"op": "remove", "path": "timezone"}]
    });
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
}

#[test]
fn test_missing_schemas_array_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = json!({
        "Operations": [{"op": "remove", "path": "timezone"}]
    });
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
}

#[test]
fn test_add_without_value_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([{"op": "add", "path": "nickName"}]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
    assert!(err.message().contains("no value for add"));
}

#[test]
fn test_replace_without_value_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([{"op": "replace", "path": "userName"}]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
}

#[test]
fn test_remove_with_value_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "remove", "path": "timezone", "value": "Asia/Shanghai"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
    assert!(err.message().contains("unnecessary"));
}

#[test]
fn test_remove_without_path_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([{"op": "remove"}]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
    assert!(err.message().contains("no path"));
}

#[test]
fn test_unknown_operation_kind_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "move", "path": "userName", "value": "elsewhere"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
    assert!(err.message().contains("move"));
}

#[test]
fn test_malformed_payload_bytes_are_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let request = PatchRequest {
        resource_id: "foo".to_string(),
        match_criteria: None,
        payload_source: Cursor::new(b"{not json".to_vec()),
    };
    let err = service.patch(&ctx, request).unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
}

#[test]
fn test_unreadable_payload_stream_is_rejected() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let request = PatchRequest {
        resource_id: "foo".to_string(),
        match_criteria: None,
        payload_source: BrokenPipe,
    };
    let err = service.patch(&ctx, request).unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidSyntax);
    assert!(err.message().contains("failed to read request body"));
}

#[test]
fn test_missing_resource_is_not_found() {
    let db = Arc::new(MemoryDb::new());
    let ctx = RequestContext::new();
    let service = patch_service(db);

    let payload = patch_payload(json!([{"op": "remove", "path": "timezone"}]));
    let err = service
        .patch(&ctx, patch_request("missing", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::NotFound);
}

#[test]
fn test_path_syntax_error_is_invalid_path() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "replace", "path": "emails[value eq \"x\"", "value": "work"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidPath);
}

#[test]
fn test_unknown_attribute_path_is_invalid_path() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "add", "path": "shoeSize", "value": 44}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidPath);
    assert_eq!(err.path(), Some("shoeSize"));
}

#[test]
fn test_value_type_mismatch_is_invalid_value() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "add", "path": "active", "value": "yes"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidValue);
}

#[test]
fn test_strict_replace_rejects_single_object_for_multi_valued() {
    // add wraps a lone element; replace requires a whole array
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "replace", "path": "emails", "value": {"value": "a@bar.com"}}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidValue);
}

#[test]
fn test_mutability_violation_is_invalid_value() {
    let (db, ctx) = seeded_db();
    let service = patch_service(db);

    let payload = patch_payload(json!([
        {"op": "replace", "path": "id", "value": "other-id"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidValue);
    assert!(err.message().contains("mutability"));
}

#[test]
fn test_failed_operation_leaves_store_unchanged() {
    // Given: A payload whose second operation fails
    let (db, ctx) = seeded_db();
    let service = patch_service(db.clone());

    let payload = patch_payload(json!([
        {"op": "replace", "path": "userName", "value": "renamed"},
        {"op": "replace", "path": "id", "value": "other-id"}
    ]));
    let err = service
        .patch(&ctx, patch_request("foo", payload))
        .unwrap_err();
    assert_eq!(err.kind(), ScimErrorKind::InvalidValue);

    // Then: The first operation's in-memory effect was never persisted
    let stored = db.get(&ctx, "foo", None).unwrap();
    let json = scimx_core::json::serialize_resource(&stored).unwrap();
    assert_eq!(json["userName"], json!("foo"));
}

// Reader that always fails, standing in for a broken transport
struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream reset"))
    }
}
