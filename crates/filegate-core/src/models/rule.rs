use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kind of content a slot accepts; selects the processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Document,
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContentKind::Image => write!(f, "image"),
            ContentKind::Document => write!(f, "document"),
        }
    }
}

/// Whether an (entity type, purpose, entity id) slot holds one file or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// Lookup key of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    pub entity_type: String,
    pub purpose: String,
}

impl RuleKey {
    pub fn new(entity_type: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            purpose: purpose.into(),
        }
    }
}

impl Display for RuleKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.entity_type, self.purpose)
    }
}

/// Static policy for one attachable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub entity_type: String,
    pub purpose: String,
    pub content_kind: ContentKind,
    pub size_limit_bytes: u64,
    pub allowed_content_types: BTreeSet<String>,
    pub cardinality: Cardinality,
}

impl Rule {
    pub fn new(
        entity_type: impl Into<String>,
        purpose: impl Into<String>,
        content_kind: ContentKind,
        size_limit_bytes: u64,
        allowed_content_types: &[&str],
        cardinality: Cardinality,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            purpose: purpose.into(),
            content_kind,
            size_limit_bytes,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
            cardinality,
        }
    }

    pub fn key(&self) -> RuleKey {
        RuleKey::new(self.entity_type.clone(), self.purpose.clone())
    }

    /// Content types are compared case-insensitively.
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .contains(&content_type.trim().to_lowercase())
    }
}
