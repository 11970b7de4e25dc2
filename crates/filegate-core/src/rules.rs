//! Rule registry
//!
//! An immutable table keyed by `(entity_type, purpose)`. It is built once at
//! startup and shared by reference (usually behind an `Arc`) with the
//! orchestrator and the URL builder, so tests can substitute their own table.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FileError, FileResult};
use crate::models::{Cardinality, ContentKind, Rule, RuleKey};

const MB: u64 = 1024 * 1024;

const RASTER_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "text/csv",
    "image/jpeg",
    "image/png",
];

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, HashMap<String, Rule>>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Built-in table of attachable slots.
    pub fn with_defaults() -> Self {
        let rules = vec![
            Rule::new(
                "APPLICATION",
                "BANNER",
                ContentKind::Image,
                5 * MB,
                RASTER_IMAGE_TYPES,
                Cardinality::One,
            ),
            Rule::new(
                "APPLICATION",
                "LOGO",
                ContentKind::Image,
                2 * MB,
                RASTER_IMAGE_TYPES,
                Cardinality::One,
            ),
            Rule::new(
                "APPLICATION",
                "ATTACHMENT",
                ContentKind::Document,
                20 * MB,
                DOCUMENT_TYPES,
                Cardinality::Many,
            ),
            Rule::new(
                "REQUEST",
                "ATTACHMENT",
                ContentKind::Document,
                10 * MB,
                DOCUMENT_TYPES,
                Cardinality::Many,
            ),
            Rule::new(
                "USER",
                "AVATAR",
                ContentKind::Image,
                2 * MB,
                RASTER_IMAGE_TYPES,
                Cardinality::One,
            ),
        ];

        let mut registry = RuleRegistry::default();
        for rule in rules {
            registry.insert(rule);
        }
        registry
    }

    /// Parse a JSON array of rules.
    pub fn from_json(json: &str) -> FileResult<Self> {
        let rules: Vec<Rule> = serde_json::from_str(json)
            .map_err(|e| FileError::Configuration(format!("Invalid rule table: {}", e)))?;

        let mut builder = Self::builder();
        for rule in rules {
            builder = builder.rule(rule);
        }
        builder.build()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FileError::Configuration(format!(
                "Failed to read rule table {}: {}",
                path.display(),
                e
            ))
        })?;

        let registry = Self::from_json(&json).inspect_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Rule table rejected");
        })?;
        tracing::info!(
            path = %path.display(),
            rule_count = registry.len(),
            "Rule table loaded"
        );
        Ok(registry)
    }

    /// Look up the rule of a slot. Absence is never replaced by a permissive default.
    pub fn lookup(&self, entity_type: &str, purpose: &str) -> Option<&Rule> {
        self.rules.get(entity_type)?.get(purpose)
    }

    /// Like [`lookup`](Self::lookup) but absence is a `RuleNotFound` fault.
    pub fn require(&self, entity_type: &str, purpose: &str) -> FileResult<&Rule> {
        self.lookup(entity_type, purpose)
            .ok_or_else(|| FileError::rule_not_found(entity_type, purpose))
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values().flat_map(HashMap::values)
    }

    fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules
            .entry(rule.entity_type.clone())
            .or_default()
            .insert(rule.purpose.clone(), rule)
    }
}

/// Builder rejecting tables a registry must never hold.
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Rule>,
}

impl RuleRegistryBuilder {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> FileResult<RuleRegistry> {
        let mut registry = RuleRegistry::default();

        for mut rule in self.rules {
            rule.allowed_content_types = rule
                .allowed_content_types
                .iter()
                .map(|ct| ct.trim().to_lowercase())
                .filter(|ct| !ct.is_empty())
                .collect();

            let key: RuleKey = rule.key();
            if key.entity_type.is_empty() || key.purpose.is_empty() {
                return Err(FileError::Configuration(format!(
                    "Rule {} has an empty entity type or purpose",
                    key
                )));
            }
            if rule.allowed_content_types.is_empty() {
                return Err(FileError::Configuration(format!(
                    "Rule {} allows no content types",
                    key
                )));
            }
            if rule.size_limit_bytes == 0 {
                return Err(FileError::Configuration(format!(
                    "Rule {} has a zero size limit",
                    key
                )));
            }
            if registry.insert(rule).is_some() {
                return Err(FileError::Configuration(format!(
                    "Duplicate rule for {}",
                    key
                )));
            }
        }

        Ok(registry)
    }
}
