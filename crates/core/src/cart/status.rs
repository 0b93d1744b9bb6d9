//! Cart status

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a stored status string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown cart status {0:?}")]
pub struct ParseCartStatusError(String);

/// Where a cart sits in its inactivity lifecycle.
///
/// `Active → Abandoned` is the only transition. An abandoned cart is purged
/// (deleted) once it has been idle past the retention window; it never becomes
/// active again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Recently used
    Active,

    /// Idle past the active timeout
    Abandoned,
}

impl CartStatus {
    /// Stable lowercase name, as stored and rendered.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Abandoned => "abandoned",
        }
    }
}

impl Display for CartStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartStatus {
    type Err = ParseCartStatusError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "active" => Ok(Self::Active),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(ParseCartStatusError(other.to_string())),
        }
    }
}
