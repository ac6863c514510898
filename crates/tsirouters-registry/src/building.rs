//! Row types for the two relations: `buildings` and `logs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One registered controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Store-assigned surrogate key. Never reused, never changed.
    pub id: u64,
    pub building_number: i64,
    pub ip_address: String,
    #[serde(default)]
    pub status: Status,
    pub last_updated: DateTime<Utc>,
}

impl Building {
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Whether this row shows up in any listing or export.
    ///
    /// Rows with non-positive numbers can only get here through a hand-edited
    /// relation file and stay hidden forever.
    pub fn is_listed(&self) -> bool {
        self.is_active() && self.building_number > 0
    }
}

/// Lifecycle state of a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Removed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub building_number: i64,
    pub action: Action,
    pub timestamp: DateTime<Utc>,
}

/// What a mutating registry call did to a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Added,
    Removed,
    Reactivated,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Reactivated => "reactivated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
