//! Peer-list wire formats.
//!
//! Exactly one format is used per artifact. `TnrV2` is the default; `IniV1`
//! is the earlier router-table layout, kept for monitoring installs that
//! still read it.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tsirouters_registry::Building;

const INI_V1_HEADER: [&str; 5] = [
    "[OPTIONS]",
    "IP_ROUTER_AUTODETECT=FALSE",
    "",
    "[ROUTERS]",
    "Format= Segment Number = IP Address of the Router, Monitor for Alarms",
];

/// Deserializes through `FromStr`, so config files accept the same names
/// and aliases as `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExportFormat {
    /// `{ip} TNR_{n}` per line, no header.
    #[default]
    #[serde(rename = "tnr-v2")]
    TnrV2,
    /// INI header followed by `{n}={ip},FALSE` per line.
    #[serde(rename = "ini-v1")]
    IniV1,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TnrV2 => "tnr-v2",
            Self::IniV1 => "ini-v1",
        }
    }

    /// One building's line.
    pub fn entry(&self, building: &Building) -> String {
        match self {
            Self::TnrV2 => format!("{} TNR_{}", building.ip_address, building.building_number),
            Self::IniV1 => format!("{}={},FALSE", building.building_number, building.ip_address),
        }
    }

    /// Render a whole artifact body. Lines are `\n`-joined with no trailing
    /// newline; order is the caller's.
    pub fn render<'a>(&self, buildings: impl IntoIterator<Item = &'a Building>) -> String {
        let mut lines: Vec<String> = match self {
            Self::TnrV2 => Vec::new(),
            Self::IniV1 => INI_V1_HEADER.iter().map(|line| line.to_string()).collect(),
        };
        lines.extend(buildings.into_iter().map(|b| self.entry(b)));
        lines.join("\n")
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tnr-v2" | "v2" => Ok(Self::TnrV2),
            "ini-v1" | "v1" => Ok(Self::IniV1),
            other => Err(format!(
                "unknown export format '{other}' (expected tnr-v2 or ini-v1)"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
