//! Mission domain model.
//!
//! # Invariants
//! - A mission holds `MIN_TARGETS..=MAX_TARGETS` targets after creation.
//! - Target names are unique within one mission (case-sensitive).
//! - `is_completed` flips to `true` once and never reverts.
//! - `end_date >= start_date` when both are given at creation.

use super::target::{NewTarget, Target};
use super::{
    normalize_required_text, CatId, MissionId, ValidationError, DESCRIPTION_MAX_CHARS,
    MAX_TARGETS, MIN_TARGETS, NAME_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persisted mission record with its active targets in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    pub description: String,
    /// Epoch milliseconds. Set to "now" on cat assignment.
    pub start_date: Option<i64>,
    /// Epoch milliseconds. Defaults to completion time when unset.
    pub end_date: Option<i64>,
    /// Cat currently assigned to this mission, if any.
    pub cat_id: Option<CatId>,
    pub is_completed: bool,
    /// Epoch milliseconds.
    pub completed_at: Option<i64>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    pub targets: Vec<Target>,
}

impl Mission {
    pub fn is_assigned(&self) -> bool {
        self.cat_id.is_some()
    }

    pub fn is_assigned_to(&self, cat_id: CatId) -> bool {
        self.cat_id == Some(cat_id)
    }

    pub fn can_add_target(&self) -> bool {
        self.targets.len() < MAX_TARGETS
    }

    /// Removing one target must leave at least `MIN_TARGETS`.
    pub fn can_remove_target(&self) -> bool {
        self.targets.len() > MIN_TARGETS
    }

    pub fn has_target_named(&self, name: &str) -> bool {
        self.targets.iter().any(|target| target.name == name)
    }

    /// True when the mission has targets and every one of them is completed.
    pub fn all_targets_completed(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(Target::is_completed)
    }

    /// True when a completion pass would flip this mission to completed.
    pub fn is_ready_to_complete(&self) -> bool {
        !self.is_completed && self.all_targets_completed()
    }
}

/// Inbound data for mission creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewMission {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub end_date: Option<i64>,
    pub targets: Vec<NewTarget>,
}

impl NewMission {
    /// Returns a trimmed copy, or the first violation found.
    ///
    /// Checks run in order: name, description, dates, target count, each
    /// target's fields, then duplicate target names.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = normalize_required_text("mission name", &self.name, NAME_MAX_CHARS)?;
        let description = normalize_required_text(
            "mission description",
            &self.description,
            DESCRIPTION_MAX_CHARS,
        )?;

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::EndBeforeStart);
            }
        }

        let count = self.targets.len();
        if !(MIN_TARGETS..=MAX_TARGETS).contains(&count) {
            return Err(ValidationError::TargetCount(count));
        }

        let targets = self
            .targets
            .iter()
            .map(NewTarget::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.name.as_str()) {
                return Err(ValidationError::DuplicateTargetName(target.name.clone()));
            }
        }

        Ok(Self {
            name,
            description,
            start_date: self.start_date,
            end_date: self.end_date,
            targets,
        })
    }
}
