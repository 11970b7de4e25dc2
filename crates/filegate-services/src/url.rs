use filegate_core::{Cardinality, FileLink, RuleRegistry};
use std::sync::Arc;
use urlencoding::encode;

/// Builds canonical file paths from links.
///
/// `/file/{entity_type}/{purpose}/{entity_id}` for single-file slots,
/// `/file/{entity_type}/{purpose}/{entity_id}/{file_id}` for multi-file slots.
///
/// Every segment is percent-encoded, so an id containing `/`, `?` or `#`
/// stays a single segment.
#[derive(Clone)]
pub struct FileUrlBuilder {
    rules: Arc<RuleRegistry>,
}

impl FileUrlBuilder {
    pub fn new(rules: Arc<RuleRegistry>) -> Self {
        Self { rules }
    }

    /// Canonical path for `link`, or `None` when no unambiguous path exists.
    pub fn build_url(&self, link: &FileLink) -> Option<String> {
        if link.entity_type.is_empty() || link.purpose.is_empty() || link.entity_id.is_empty() {
            tracing::debug!(?link, "No URL for link with missing identifiers");
            return None;
        }

        let Some(rule) = self.rules.lookup(&link.entity_type, &link.purpose) else {
            tracing::warn!(
                entity_type = %link.entity_type,
                purpose = %link.purpose,
                "No URL for link without a rule"
            );
            return None;
        };

        let segments = [&link.entity_type, &link.purpose, &link.entity_id];
        if segments.iter().any(|s| matches!(s.as_str(), "." | "..")) {
            tracing::warn!(?link, "No URL for link with a dot segment");
            return None;
        }

        let base = format!(
            "/file/{}/{}/{}",
            encode(&link.entity_type),
            encode(&link.purpose),
            encode(&link.entity_id)
        );

        match rule.cardinality {
            Cardinality::One => Some(base),
            Cardinality::Many => match &link.file {
                Some(file) => Some(format!("{}/{}", base, file.id)),
                None => {
                    tracing::warn!(
                        entity_type = %link.entity_type,
                        purpose = %link.purpose,
                        entity_id = %link.entity_id,
                        "No URL for multi-file slot link without a file"
                    );
                    None
                }
            },
        }
    }
}
