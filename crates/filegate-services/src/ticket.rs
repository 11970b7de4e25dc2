//! Access ticketing.
//!
//! Turns a canonical file path into a client-safe locator by asking a
//! [`TicketIssuer`] for a token scoped to one resource and one audience.

use crate::url::FileUrlBuilder;
use async_trait::async_trait;
use filegate_core::{Audience, FileLink, FileResult};
use std::sync::Arc;
use std::time::Duration;

/// Issuer-specific settings passed through on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketOptions {
    /// Overrides the issuer's default lifetime.
    pub expires_in: Option<Duration>,
}

impl TicketOptions {
    pub fn expires_in(expires_in: Duration) -> Self {
        Self {
            expires_in: Some(expires_in),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequest {
    pub subject_user_id: String,
    /// Canonical path without its leading `/`.
    pub resource_identifier: String,
    pub audience: Audience,
    pub options: TicketOptions,
}

/// Mints opaque access tokens. The returned string is never inspected.
#[async_trait]
pub trait TicketIssuer: Send + Sync {
    async fn issue(&self, request: TicketRequest) -> FileResult<String>;
}

#[derive(Clone)]
pub struct AccessUrlBuilder {
    urls: FileUrlBuilder,
    issuer: Arc<dyn TicketIssuer>,
}

impl AccessUrlBuilder {
    pub fn new(urls: FileUrlBuilder, issuer: Arc<dyn TicketIssuer>) -> Self {
        Self { urls, issuer }
    }

    /// Canonical path plus `?ticket=`, or `None` when the link has no URL.
    ///
    /// Issuer failures propagate as errors; they never degrade to an
    /// unticketed path.
    pub async fn to_access_url(
        &self,
        link: &FileLink,
        subject_user_id: &str,
        audience: Audience,
        options: &TicketOptions,
    ) -> FileResult<Option<String>> {
        let Some(path) = self.urls.build_url(link) else {
            return Ok(None);
        };

        let request = TicketRequest {
            subject_user_id: subject_user_id.to_string(),
            resource_identifier: path.trim_start_matches('/').to_string(),
            audience,
            options: options.clone(),
        };

        let token = self.issuer.issue(request).await.inspect_err(|e| {
            tracing::error!(error = %e, path = %path, audience = %audience, "Ticket issue failed");
        })?;

        tracing::debug!(path = %path, audience = %audience, "Access URL issued");

        Ok(Some(format!("{}?ticket={}", path, urlencoding::encode(&token))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filegate_core::{FileError, RuleRegistry};
    use std::sync::Mutex;

    /// Returns a fixed token and records what it was asked for
    #[derive(Default)]
    struct RecordingIssuer {
        requests: Mutex<Vec<TicketRequest>>,
    }

    #[async_trait]
    impl TicketIssuer for RecordingIssuer {
        async fn issue(&self, request: TicketRequest) -> FileResult<String> {
            self.requests.lock().unwrap().push(request);
            Ok("tok en/1".to_string())
        }
    }

    struct FailingIssuer;

    #[async_trait]
    impl TicketIssuer for FailingIssuer {
        async fn issue(&self, _request: TicketRequest) -> FileResult<String> {
            Err(FileError::Ticket("issuer unavailable".to_string()))
        }
    }

    fn urls() -> FileUrlBuilder {
        FileUrlBuilder::new(Arc::new(RuleRegistry::with_defaults()))
    }

    #[tokio::test]
    async fn test_access_url_threads_audience_and_resource() {
        let issuer = Arc::new(RecordingIssuer::default());
        let builder = AccessUrlBuilder::new(urls(), issuer.clone());
        let link = FileLink::new("USER", "AVATAR", "u-1");

        let url = builder
            .to_access_url(
                &link,
                "viewer-9",
                Audience::Download,
                &TicketOptions::expires_in(Duration::from_secs(60)),
            )
            .await
            .unwrap();

        assert_eq!(url.as_deref(), Some("/file/USER/AVATAR/u-1?ticket=tok%20en%2F1"));

        let requests = issuer.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[TicketRequest {
                subject_user_id: "viewer-9".to_string(),
                resource_identifier: "file/USER/AVATAR/u-1".to_string(),
                audience: Audience::Download,
                options: TicketOptions::expires_in(Duration::from_secs(60)),
            }]
        );
    }

    #[tokio::test]
    async fn test_no_url_means_no_ticket() {
        let issuer = Arc::new(RecordingIssuer::default());
        let builder = AccessUrlBuilder::new(urls(), issuer.clone());
        let link = FileLink::new("REQUEST", "ATTACHMENT", "3");

        let url = builder
            .to_access_url(&link, "viewer", Audience::Viewing, &TicketOptions::default())
            .await
            .unwrap();

        assert!(url.is_none());
        assert!(issuer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_issuer_failure_propagates() {
        let builder = AccessUrlBuilder::new(urls(), Arc::new(FailingIssuer));
        let link = FileLink::new("APPLICATION", "LOGO", "5");

        let result = builder
            .to_access_url(&link, "viewer", Audience::Viewing, &TicketOptions::default())
            .await;
        assert!(matches!(result, Err(FileError::Ticket(_))));
    }
}
