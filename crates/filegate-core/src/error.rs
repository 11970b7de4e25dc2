//! Error types module
//!
//! Every fault raised by Filegate is a [`FileError`]. Each variant carries a
//! stable machine-readable code through [`ErrorMetadata`], so transports can
//! map faults to responses without matching on messages.

use serde::Serialize;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for caller misuse
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code a transport should answer with
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "RULE_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether the caller may retry the operation
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// A single problem found while validating an upload candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    /// Binary content is absent or empty. Reported alone.
    MissingOrEmpty { field: String },
    /// Declared content type is not in the rule's allowed set.
    InvalidMimetype {
        field: String,
        received: String,
        allowed: Vec<String>,
    },
    /// Content is larger than the rule's size limit.
    MaxSizeExceeded {
        field: String,
        received: u64,
        max: u64,
    },
}

impl Violation {
    /// Stable code of the violation, as serialized in the `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::MissingOrEmpty { .. } => "missing_or_empty",
            Violation::InvalidMimetype { .. } => "invalid_mimetype",
            Violation::MaxSizeExceeded { .. } => "max_size_exceeded",
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Violation::MissingOrEmpty { field }
            | Violation::InvalidMimetype { field, .. }
            | Violation::MaxSizeExceeded { field, .. } => field,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingOrEmpty { field } => {
                write!(f, "{}: file content is missing or empty", field)
            }
            Violation::InvalidMimetype {
                field,
                received,
                allowed,
            } => write!(
                f,
                "{}: content type {} is not allowed (allowed: {})",
                field,
                received,
                allowed.join(", ")
            ),
            Violation::MaxSizeExceeded {
                field,
                received,
                max,
            } => write!(
                f,
                "{}: file is {} bytes, the limit is {} bytes",
                field, received, max
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No file rule for entity type {entity_type} and purpose {purpose}")]
    RuleNotFound { entity_type: String, purpose: String },

    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("Storage adapter error: {0}")]
    Adapter(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Ticket error: {0}")]
    Ticket(String),
}

/// Result type for Filegate operations
pub type FileResult<T> = Result<T, FileError>;

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FileError {
    pub fn rule_not_found(entity_type: impl Into<String>, purpose: impl Into<String>) -> Self {
        FileError::RuleNotFound {
            entity_type: entity_type.into(),
            purpose: purpose.into(),
        }
    }

    /// Violations carried by a validation fault, empty for every other variant.
    pub fn violations(&self) -> &[Violation] {
        match self {
            FileError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn file_error_static_metadata(err: &FileError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        FileError::Configuration(_) => (500, "CONFIGURATION_FAULT", false, true, LogLevel::Error),
        FileError::RuleNotFound { .. } => (400, "RULE_NOT_FOUND", false, false, LogLevel::Warn),
        FileError::Validation(_) => (422, "VALIDATION_FAULT", false, false, LogLevel::Debug),
        FileError::Adapter(_) => (500, "ADAPTER_FAULT", true, true, LogLevel::Error),
        FileError::Processing(_) => (422, "PROCESSING_FAULT", false, false, LogLevel::Warn),
        FileError::Ticket(_) => (500, "TICKET_FAULT", true, true, LogLevel::Error),
    }
}

impl ErrorMetadata for FileError {
    fn http_status_code(&self) -> u16 {
        file_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        file_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        file_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        file_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        file_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            FileError::Configuration(_) => "File storage is misconfigured".to_string(),
            FileError::RuleNotFound { .. } => self.to_string(),
            FileError::Validation(_) => self.to_string(),
            FileError::Adapter(_) => "Failed to access file storage".to_string(),
            FileError::Processing(ref msg) => msg.clone(),
            FileError::Ticket(_) => "Failed to issue file access ticket".to_string(),
        }
    }
}
