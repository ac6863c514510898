//! User-facing advisory notices.
//!
//! Every `add`/`remove` call returns exactly one `Notice`. Validation,
//! conflict and not-found outcomes are notices, never errors.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Added,
    Reactivated,
    Removed,
    Validation,
    Conflict,
    NotFound,
}

impl NoticeKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Added | Self::Reactivated | Self::Removed => Severity::Info,
            Self::Validation | Self::Conflict | Self::NotFound => Severity::Error,
        }
    }
}

/// Which boundary a raw building-number string arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Add,
    Remove,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn added(number: i64, ip: &str) -> Self {
        Self::new(NoticeKind::Added, format!("Added building {number} ({ip})."))
    }

    pub fn reactivated(number: i64, ip: &str) -> Self {
        Self::new(
            NoticeKind::Reactivated,
            format!("Re-activated building {number} ({ip})."),
        )
    }

    pub fn removed(number: i64) -> Self {
        Self::new(NoticeKind::Removed, format!("Removed building {number}."))
    }

    pub fn invalid_add_input() -> Self {
        Self::new(NoticeKind::Validation, "Invalid building number or IP.")
    }

    pub fn invalid_remove_input() -> Self {
        Self::new(NoticeKind::Validation, "Invalid building number.")
    }

    /// Non-integer building number at the input boundary.
    pub fn not_an_integer(context: InputContext) -> Self {
        let message = match context {
            InputContext::Add => "Building number must be an integer.",
            InputContext::Remove => "Invalid removal request.",
            InputContext::Export => "Specify a valid building number for single export.",
        };
        Self::new(NoticeKind::Validation, message)
    }

    pub fn already_exists(number: i64) -> Self {
        Self::new(
            NoticeKind::Conflict,
            format!("Building {number} already exists."),
        )
    }

    pub fn not_found(number: i64) -> Self {
        Self::new(
            NoticeKind::NotFound,
            format!("Building {number} not found in master list."),
        )
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Coerce a raw building number the way the input boundary does.
///
/// Surrounding whitespace and a leading `+` are accepted; anything else that
/// is not an integer becomes the context's validation notice. Range checks
/// (`> 0`) are the registry's job, not this function's.
pub fn parse_building_number(raw: &str, context: InputContext) -> Result<i64, Notice> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Notice::not_an_integer(context))
}
