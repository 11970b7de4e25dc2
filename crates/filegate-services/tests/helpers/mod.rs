pub mod fixtures;

use filegate_core::FileGateConfig;
use filegate_services::{FileGate, JwtTicketIssuer};
use std::time::Duration;
use tempfile::TempDir;

pub const TICKET_SECRET: &str = "test-ticket-secret-with-32-chars!";

/// File gate over a throwaway local storage directory
pub struct TestGate {
    pub gate: FileGate,
    pub _temp_dir: TempDir,
}

impl TestGate {
    pub fn storage_root(&self) -> std::path::PathBuf {
        self._temp_dir.path().join("storage")
    }

    /// Verifier sharing the gate's secret
    pub fn verifier(&self) -> JwtTicketIssuer {
        JwtTicketIssuer::new(TICKET_SECRET, Duration::from_secs(300)).unwrap()
    }
}

/// Setup a file gate with the default rule table and ticketing enabled
pub async fn setup_test_gate() -> TestGate {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = FileGateConfig {
        ticket_secret: Some(TICKET_SECRET.to_string()),
        ..FileGateConfig::local(temp_dir.path().join("storage"))
    };

    let gate = FileGate::from_config(&config).await.unwrap();
    TestGate {
        gate,
        _temp_dir: temp_dir,
    }
}

/// Count regular files below `dir`
pub fn count_files(dir: &std::path::Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}
