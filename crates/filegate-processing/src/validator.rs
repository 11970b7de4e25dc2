//! Upload validation against a rule.
//!
//! [`validate`] is a pure check: no I/O, no side effects. It never runs as
//! part of storing; callers either run it themselves or go through
//! [`validate_upload`], whose [`ValidatedUpload`] is the only input the
//! validated store path accepts.

use bytes::Bytes;
use filegate_core::{FileError, FileResult, Rule, Violation};

/// Upload as received from a caller, before any check.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// `None` when the request carried no file part at all.
    pub data: Option<Bytes>,
    pub content_type: String,
}

impl UploadCandidate {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            content_type: content_type.into(),
        }
    }

    pub fn missing(content_type: impl Into<String>) -> Self {
        Self {
            data: None,
            content_type: content_type.into(),
        }
    }
}

/// Upload that passed every check of the rule it was validated against.
///
/// Only [`validate_upload`] can build one. It carries a copy of that rule so
/// a store can confirm it matches the registry's rule for the same slot.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    data: Bytes,
    content_type: String,
    rule: Rule,
}

impl ValidatedUpload {
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Rule the upload was validated against.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn into_parts(self) -> (Bytes, String, Rule) {
        (self.data, self.content_type, self.rule)
    }
}

/// Check a candidate against a rule and return every violation found.
///
/// Missing or empty content is reported alone. Otherwise the content type and
/// size checks both run so a caller can report all problems at once.
pub fn validate(candidate: &UploadCandidate, field_name: &str, rule: &Rule) -> Vec<Violation> {
    let data = match &candidate.data {
        Some(data) if !data.is_empty() => data,
        _ => {
            return vec![Violation::MissingOrEmpty {
                field: field_name.to_string(),
            }]
        }
    };

    let mut violations = Vec::new();

    if !rule.allows_content_type(&candidate.content_type) {
        violations.push(Violation::InvalidMimetype {
            field: field_name.to_string(),
            received: candidate.content_type.clone(),
            allowed: rule.allowed_content_types.iter().cloned().collect(),
        });
    }

    let size = data.len() as u64;
    if size > rule.size_limit_bytes {
        violations.push(Violation::MaxSizeExceeded {
            field: field_name.to_string(),
            received: size,
            max: rule.size_limit_bytes,
        });
    }

    violations
}

/// Validate and, on success, wrap the candidate as a [`ValidatedUpload`].
pub fn validate_upload(
    candidate: UploadCandidate,
    field_name: &str,
    rule: &Rule,
) -> FileResult<ValidatedUpload> {
    let violations = validate(&candidate, field_name, rule);
    if !violations.is_empty() {
        tracing::debug!(
            rule = %rule.key(),
            field = %field_name,
            violation_count = violations.len(),
            "Upload rejected by validation"
        );
        return Err(FileError::Validation(violations));
    }

    // validate() returned no violations, so data is present and non-empty
    let data = candidate.data.unwrap_or_default();

    Ok(ValidatedUpload {
        data,
        content_type: candidate.content_type.trim().to_lowercase(),
        rule: rule.clone(),
    })
}
