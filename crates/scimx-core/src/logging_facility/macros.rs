//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use scimx_core::log_op_start;
/// log_op_start!("patch");
/// log_op_start!("patch", resource_id = "2b1a");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use scimx_core::log_op_end;
/// log_op_end!("patch", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use scimx_core::{log_op_error, errors::{ScimError, ScimErrorKind}};
/// let err = ScimError::new(ScimErrorKind::NotFound).with_resource_id("2b1a");
/// log_op_error!("patch", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ScimError;
        let scim_err: ScimError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?scim_err.kind(),
            err_code = scim_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ScimError;
        let scim_err: ScimError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = scimx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?scim_err.kind(),
            err_code = scim_err.code(),
            $($field)*
        );
    }};
}
