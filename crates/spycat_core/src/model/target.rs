//! Target domain model.
//!
//! # Invariants
//! - Status only moves forward: `init -> in_progress -> completed`.
//! - `completed` is terminal; status and notes are frozen afterwards.
//! - Name and country are required, at most `NAME_MAX_CHARS` characters.

use super::{
    normalize_required_text, MissionId, TargetId, ValidationError, NAME_MAX_CHARS,
    NOTES_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Progress state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// Created, no work recorded yet.
    Init,
    /// Work has started.
    InProgress,
    /// Done. Terminal.
    Completed,
}

impl TargetStatus {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Returns whether moving from `self` to `next` keeps status monotonic.
    ///
    /// Re-applying the current non-terminal status is allowed; skipping
    /// `in_progress` is allowed; anything out of `completed` is not.
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next >= self
    }
}

impl Display for TargetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetStatus {
    type Err = ValidationError;

    /// Parses case-insensitively after trimming surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "init" => Ok(Self::Init),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError::UnknownStatus(value.to_string())),
        }
    }
}

/// Persisted target record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: Option<String>,
    pub status: TargetStatus,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Target {
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Targets that never left `init` are not eligible for removal.
    pub fn is_removable(&self) -> bool {
        self.status != TargetStatus::Init
    }
}

/// Inbound data for a target created with a mission or added later.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewTarget {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTarget {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            notes: None,
        }
    }

    /// Returns a trimmed copy, or the first field violation.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: normalize_required_text("target name", &self.name, NAME_MAX_CHARS)?,
            country: normalize_required_text("target country", &self.country, NAME_MAX_CHARS)?,
            notes: normalize_notes(self.notes.as_deref())?,
        })
    }
}

/// Empty notes collapse to `None`; non-empty notes are length-checked.
pub fn normalize_notes(notes: Option<&str>) -> Result<Option<String>, ValidationError> {
    match notes {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) if value.chars().count() > NOTES_MAX_CHARS => Err(ValidationError::TooLong {
            field: "target notes",
            max: NOTES_MAX_CHARS,
        }),
        Some(value) => Ok(Some(value.to_string())),
    }
}
