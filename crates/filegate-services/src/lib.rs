//! Filegate Services Library
//!
//! This crate composes the core, storage and processing crates into the
//! entry points callers use: the storage orchestrator, the canonical URL
//! builder and the access ticketing adapter.
//!
//! ```no_run
//! # async fn run() -> filegate_core::FileResult<()> {
//! use filegate_core::{Audience, FileGateConfig, FileLink};
//! use filegate_services::{FileGate, StoreRequest, TicketOptions};
//!
//! let config = FileGateConfig::from_env()?;
//! filegate_services::telemetry::init_telemetry(config.log_json)?;
//! let gate = FileGate::from_config(&config).await?;
//!
//! let request = StoreRequest::new("banner.jpg", "image/jpeg", "APPLICATION", "12", "BANNER");
//! let file = gate.storage().store(bytes::Bytes::from_static(b"..."), request).await?;
//!
//! let link = FileLink::new("APPLICATION", "BANNER", "12").with_file(&file);
//! let url = gate
//!     .access()?
//!     .to_access_url(&link, "user-1", Audience::Viewing, &TicketOptions::default())
//!     .await?;
//! # let _ = url;
//! # Ok(())
//! # }
//! ```

pub mod gate;
pub mod jwt;
pub mod storage_service;
pub mod telemetry;
pub mod ticket;
pub mod url;

// Re-export commonly used types
pub use gate::FileGate;
pub use jwt::JwtTicketIssuer;
pub use storage_service::{FileStorageService, StoreRequest};
pub use ticket::{AccessUrlBuilder, TicketIssuer, TicketOptions, TicketRequest};
pub use url::FileUrlBuilder;
