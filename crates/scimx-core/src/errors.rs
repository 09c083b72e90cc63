use crate::expr::CompileError;

/// Result type alias using ScimError
pub type Result<T> = std::result::Result<T, ScimError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the scimx system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and external API responses.
/// The set is closed: every failure an operation can surface carries exactly
/// one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScimErrorKind {
    /// The requested capability is disabled in the service provider config
    Unsupported,
    /// The request payload is malformed (bad JSON, bad message schema,
    /// missing operation value, unknown operation kind)
    InvalidSyntax,
    /// A path expression is malformed or names an undefined attribute
    InvalidPath,
    /// An operation value does not fit the target attribute (type,
    /// structure, or mutability)
    InvalidValue,
    /// The addressed resource does not exist
    NotFound,
    /// A precondition failed or a concurrent write won the race
    Conflict,
    /// An engine defect or environmental failure
    Internal,
}

impl ScimErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ScimErrorKind::Unsupported => "ERR_UNSUPPORTED",
            ScimErrorKind::InvalidSyntax => "ERR_INVALID_SYNTAX",
            ScimErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ScimErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ScimErrorKind::NotFound => "ERR_NOT_FOUND",
            ScimErrorKind::Conflict => "ERR_CONFLICT",
            ScimErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Get the SCIM `scimType` keyword for this kind, where the protocol
    /// defines one
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            ScimErrorKind::InvalidSyntax => Some("invalidSyntax"),
            ScimErrorKind::InvalidPath => Some("invalidPath"),
            ScimErrorKind::InvalidValue => Some("invalidValue"),
            _ => None,
        }
    }

    /// Get the HTTP status an HTTP binding would map this kind to
    pub fn http_status(&self) -> u16 {
        match self {
            ScimErrorKind::Unsupported => 501,
            ScimErrorKind::InvalidSyntax => 400,
            ScimErrorKind::InvalidPath => 400,
            ScimErrorKind::InvalidValue => 400,
            ScimErrorKind::NotFound => 404,
            ScimErrorKind::Conflict => 409,
            ScimErrorKind::Internal => 500,
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for
/// debugging.
#[derive(Debug, Clone)]
pub struct ScimError {
    kind: ScimErrorKind,
    op: Option<String>,
    resource_id: Option<String>,
    path: Option<String>,
    message: String,
}

impl ScimError {
    /// Create a new error with the specified kind
    pub fn new(kind: ScimErrorKind) -> Self {
        Self {
            kind,
            op: None,
            resource_id: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add resource ID context
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ScimErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the resource ID context, if any
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ScimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(resource_id) = &self.resource_id {
            write!(f, " (resource_id: {})", resource_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ScimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Conversion from path compiler errors to the canonical error facility.
///
/// A path that fails to compile is an invalid path in protocol terms, not a
/// payload syntax problem.
impl From<CompileError> for ScimError {
    fn from(err: CompileError) -> Self {
        ScimError::new(ScimErrorKind::InvalidPath).with_message(err.to_string())
    }
}

/// Conversion from serde_json::Error to ScimError
impl From<serde_json::Error> for ScimError {
    fn from(err: serde_json::Error) -> Self {
        ScimError::new(ScimErrorKind::InvalidSyntax).with_message(err.to_string())
    }
}
