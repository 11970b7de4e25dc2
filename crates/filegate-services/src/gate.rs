use crate::jwt::JwtTicketIssuer;
use crate::storage_service::FileStorageService;
use crate::ticket::{AccessUrlBuilder, TicketIssuer};
use crate::url::FileUrlBuilder;
use filegate_core::{FileError, FileGateConfig, FileResult, RuleRegistry};
use filegate_storage::create_storage;
use std::sync::Arc;
use std::time::Duration;

/// Fully wired file subsystem.
#[derive(Clone)]
pub struct FileGate {
    rules: Arc<RuleRegistry>,
    storage: FileStorageService,
    urls: FileUrlBuilder,
    access: Option<AccessUrlBuilder>,
}

impl FileGate {
    /// Build every component from configuration.
    ///
    /// Rules come from `rules_path` when set, otherwise the built-in table.
    /// Access URLs are only available when a ticket secret is configured or
    /// an issuer is supplied through [`FileGate::with_issuer`].
    pub async fn from_config(config: &FileGateConfig) -> FileResult<Self> {
        config.validate()?;

        let rules = match &config.rules_path {
            Some(path) => RuleRegistry::from_json_file(path)?,
            None => RuleRegistry::with_defaults(),
        };
        let rules = Arc::new(rules);

        let backend = create_storage(config).await?;
        let storage = FileStorageService::new(rules.clone(), backend)
            .with_display_name_max_length(config.display_name_max_length);
        let urls = FileUrlBuilder::new(rules.clone());

        let access = match &config.ticket_secret {
            Some(secret) => {
                let issuer =
                    JwtTicketIssuer::new(secret, Duration::from_secs(config.ticket_ttl_secs))?;
                Some(AccessUrlBuilder::new(urls.clone(), Arc::new(issuer)))
            }
            None => None,
        };

        tracing::info!(
            backend = %config.storage_backend,
            rule_count = rules.len(),
            tickets_enabled = access.is_some(),
            "File gate initialized"
        );

        Ok(Self {
            rules,
            storage,
            urls,
            access,
        })
    }

    /// Use an external ticket issuer instead of the built-in one.
    pub fn with_issuer(mut self, issuer: Arc<dyn TicketIssuer>) -> Self {
        self.access = Some(AccessUrlBuilder::new(self.urls.clone(), issuer));
        self
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn storage(&self) -> &FileStorageService {
        &self.storage
    }

    pub fn urls(&self) -> &FileUrlBuilder {
        &self.urls
    }

    pub fn access(&self) -> FileResult<&AccessUrlBuilder> {
        self.access.as_ref().ok_or_else(|| {
            FileError::Configuration(
                "No ticket issuer configured (set FILE_TICKET_SECRET)".to_string(),
            )
        })
    }
}
