use strata_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using StrataError
pub type Result<T> = std::result::Result<T, StrataError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code used by tests, logs and the HTTP
/// boundary. Only `InvalidInput` and `NotFound` are expected outcomes of a
/// diff request; every other kind is an infrastructure failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Timeout,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for failures of the storage collaborator or the process itself,
    /// as opposed to a problem with the caller's request.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::NotFound
                | ExErrorKind::AlreadyExists
                | ExErrorKind::ConstraintViolation
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional
/// context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Strata operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrataError {
    // ===== Diff Request Errors =====
    /// `from` or `to` was missing or empty
    #[error("from and to snapshot IDs required")]
    MissingSnapshotIds,

    /// One or both sides of a diff did not resolve
    #[error("Snapshot(s) not found")]
    SnapshotsNotFound { missing: Vec<String> },

    // ===== Entity Errors =====
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    #[error("Building spec not found: {spec_id}")]
    SpecNotFound { spec_id: String },

    #[error("Entity already exists: {entity_id}")]
    AlreadyExists { entity_id: String },

    // ===== Validation Errors =====
    #[error("Invalid building spec status: {value}")]
    InvalidSpecStatus { value: String },

    #[error("Invalid building spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("Cache capacity must be at least 1")]
    InvalidCacheCapacity,

    #[error("Invalid seed: {reason}")]
    InvalidSeed { reason: String },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<StrataError> for ExError {
    fn from(err: StrataError) -> Self {
        let message = err.to_string();
        match err {
            StrataError::MissingSnapshotIds => ExError::new(ExErrorKind::InvalidInput)
                .with_op("snapshot_diff")
                .with_message(message),

            StrataError::SnapshotsNotFound { missing } => {
                let err = ExError::new(ExErrorKind::NotFound)
                    .with_op("snapshot_diff")
                    .with_message(message);
                match missing.first() {
                    Some(id) => err.with_entity_id(id.clone()),
                    None => err,
                }
            }

            StrataError::SnapshotNotFound { snapshot_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(snapshot_id)
                    .with_message(message)
            }

            StrataError::SpecNotFound { spec_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(spec_id)
                .with_message(message),

            StrataError::AlreadyExists { entity_id } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(entity_id)
                .with_message(message),

            StrataError::InvalidSpecStatus { .. }
            | StrataError::InvalidSpec { .. }
            | StrataError::InvalidCacheCapacity
            | StrataError::InvalidSeed { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            StrataError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            StrataError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        StrataError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_are_not_infrastructure() {
        assert!(!ExErrorKind::InvalidInput.is_infrastructure());
        assert!(!ExErrorKind::NotFound.is_infrastructure());
        assert!(ExErrorKind::Persistence.is_infrastructure());
        assert!(ExErrorKind::Timeout.is_infrastructure());
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);
        let source = std::error::Error::source(&outer).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("[ERR_IO]: disk gone"));
    }

    #[test]
    fn test_snapshots_not_found_carries_first_missing_id() {
        let ex: ExError = StrataError::SnapshotsNotFound {
            missing: vec!["s-1".to_string(), "s-2".to_string()],
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
        assert_eq!(ex.entity_id(), Some("s-1"));
        assert_eq!(ex.message(), "Snapshot(s) not found");
    }
}
