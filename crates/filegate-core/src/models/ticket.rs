use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::FileError;

/// Intended usage of an access ticket. A verifier uses it to pick the
/// response disposition (inline vs attachment), so it never has a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Viewing,
    Download,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Viewing => "viewing",
            Audience::Download => "download",
        }
    }
}

impl Display for Audience {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewing" => Ok(Audience::Viewing),
            "download" => Ok(Audience::Download),
            other => Err(FileError::Ticket(format!("Unknown ticket audience: {}", other))),
        }
    }
}

/// Claims of a verified access ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTicket {
    pub subject_user_id: String,
    pub resource_identifier: String,
    pub audience: Audience,
    /// Expiry as a unix timestamp (seconds).
    pub expires_at: i64,
}
