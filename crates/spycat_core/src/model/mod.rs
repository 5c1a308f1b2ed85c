//! Agency domain model: cats, missions and targets.
//!
//! # Responsibility
//! - Define the record types shared by repositories and lifecycle services.
//! - Own field-level validation for inbound create requests.
//!
//! # Invariants
//! - Text limits are measured in characters, not bytes.
//! - A mission owns 1..=3 targets; a cat references at most one mission.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cat;
pub mod mission;
pub mod target;

/// Row id of a `spy_cats` record.
pub type CatId = i64;
/// Row id of a `missions` record.
pub type MissionId = i64;
/// Row id of a `targets` record.
pub type TargetId = i64;

/// Max characters for names, breeds and countries.
pub const NAME_MAX_CHARS: usize = 100;
/// Max characters for a mission description.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Max characters for target notes.
pub const NOTES_MAX_CHARS: usize = 2000;
/// Lower bound of targets per mission.
pub const MIN_TARGETS: usize = 1;
/// Upper bound of targets per mission.
pub const MAX_TARGETS: usize = 3;

/// Field-level validation failure, reported verbatim to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or whitespace only.
    Required(&'static str),
    /// Field exceeds its character limit.
    TooLong { field: &'static str, max: usize },
    /// Numeric field below zero.
    Negative(&'static str),
    /// Numeric field is NaN or infinite.
    NotFinite(&'static str),
    /// `end_date` precedes `start_date`.
    EndBeforeStart,
    /// Mission target list outside `MIN_TARGETS..=MAX_TARGETS`.
    TargetCount(usize),
    /// Two targets in one request share a name.
    DuplicateTargetName(String),
    /// Status string is not one of `init|in_progress|completed`.
    UnknownStatus(String),
    /// Breed is not present in the breed catalog.
    UnknownBreed(String),
    /// Pagination parameter out of range.
    Pagination(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{field} is required"),
            Self::TooLong { field, max } => {
                write!(f, "{field} cannot exceed {max} characters")
            }
            Self::Negative(field) => write!(f, "{field} cannot be negative"),
            Self::NotFinite(field) => write!(f, "{field} must be a finite number"),
            Self::EndBeforeStart => write!(f, "mission end date must be after start date"),
            Self::TargetCount(count) => write!(
                f,
                "mission must have between {MIN_TARGETS} and {MAX_TARGETS} targets, got {count}"
            ),
            Self::DuplicateTargetName(name) => write!(
                f,
                "duplicate target name `{name}` is not allowed in the same mission"
            ),
            Self::UnknownStatus(value) => write!(
                f,
                "invalid target status `{value}`; expected init|in_progress|completed"
            ),
            Self::UnknownBreed(value) => write!(f, "unknown cat breed `{value}`"),
            Self::Pagination(message) => write!(f, "invalid pagination: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and checks it is non-empty and within `max` characters.
pub(crate) fn normalize_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}
