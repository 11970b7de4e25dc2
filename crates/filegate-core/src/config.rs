//! Configuration module
//!
//! Environment-driven settings for the storage backend, display names, access
//! tickets and logging. A `.env` file is loaded first when present.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{FileError, FileResult};
use crate::storage_types::StorageBackend;

const LOCAL_STORAGE_PATH: &str = "./storage";
const DISPLAY_NAME_MAX_LENGTH: usize = 255;
const TICKET_TTL_SECS: u64 = 300;
const MIN_TICKET_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct FileGateConfig {
    pub storage_backend: StorageBackend,
    pub local_storage_path: PathBuf,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub s3_endpoint: Option<String>,
    pub display_name_max_length: usize,
    pub ticket_secret: Option<String>,
    pub ticket_ttl_secs: u64,
    pub rules_path: Option<PathBuf>,
    pub log_json: bool,
}

impl Default for FileGateConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Local,
            local_storage_path: PathBuf::from(LOCAL_STORAGE_PATH),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            display_name_max_length: DISPLAY_NAME_MAX_LENGTH,
            ticket_secret: None,
            ticket_ttl_secs: TICKET_TTL_SECS,
            rules_path: None,
            log_json: false,
        }
    }
}

impl FileGateConfig {
    /// Local filesystem configuration rooted at `path`, everything else default.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local_storage_path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> FileResult<Self> {
        dotenvy::dotenv().ok();

        // An unknown backend is fatal; it never falls back to local.
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::from_str(&value)?,
            Err(_) => StorageBackend::Local,
        };

        let config = FileGateConfig {
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(LOCAL_STORAGE_PATH)),
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok()
                .filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            display_name_max_length: parse_var("DISPLAY_NAME_MAX_LENGTH", DISPLAY_NAME_MAX_LENGTH)?,
            ticket_secret: env::var("FILE_TICKET_SECRET").ok().filter(|s| !s.is_empty()),
            ticket_ttl_secs: parse_var("FILE_TICKET_TTL_SECS", TICKET_TTL_SECS)?,
            rules_path: env::var("FILE_RULES_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FileResult<()> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(FileError::Configuration(
                        "S3_BUCKET must be set when using S3 storage backend".to_string(),
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(FileError::Configuration(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                            .to_string(),
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.as_os_str().is_empty() {
                    return Err(FileError::Configuration(
                        "LOCAL_STORAGE_PATH must not be empty".to_string(),
                    ));
                }
            }
        }

        if self.display_name_max_length == 0 {
            return Err(FileError::Configuration(
                "DISPLAY_NAME_MAX_LENGTH must be positive".to_string(),
            ));
        }

        if let Some(secret) = &self.ticket_secret {
            if secret.len() < MIN_TICKET_SECRET_LEN {
                return Err(FileError::Configuration(format!(
                    "FILE_TICKET_SECRET must be at least {} characters long",
                    MIN_TICKET_SECRET_LEN
                )));
            }
        }

        if self.ticket_ttl_secs == 0 {
            return Err(FileError::Configuration(
                "FILE_TICKET_TTL_SECS must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> FileResult<T> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| FileError::Configuration(format!("{} must be a valid number", name))),
        Err(_) => Ok(default),
    }
}
