//! Mission lifecycle rules.
//!
//! # Responsibility
//! - Create missions together with their targets.
//! - Delete unassigned missions with their targets.
//! - Detect and apply mission auto-completion.
//! - Answer free-cat and cat-to-mission lookups.
//!
//! # Invariants
//! - A mission and its initial targets are written through one context.
//! - Completion is one-way and idempotent, and frees the assigned cat.

use super::assignment;
use super::error::{AgencyError, AgencyResult};
use crate::model::cat::Cat;
use crate::model::mission::{Mission, NewMission};
use crate::model::{CatId, MissionId};
use crate::repo::cat_repo::CatRepository;
use crate::repo::context::RepoContext;
use crate::repo::mission_repo::MissionRepository;
use crate::repo::target_repo::TargetRepository;
use log::info;

/// Persists a validated mission and its targets; every target starts `init`.
///
/// # Errors
/// - `Validation` when `request` breaks any field or target-count rule.
pub fn create(ctx: &RepoContext<'_>, request: &NewMission) -> AgencyResult<Mission> {
    let request = request.normalized()?;

    let mission_id = ctx.missions().insert_mission(&request)?;
    for target in &request.targets {
        ctx.targets().insert_target(mission_id, target)?;
    }

    info!(
        "event=mission_create module=mission status=ok mission_id={mission_id} target_count={}",
        request.targets.len()
    );
    ctx.missions()
        .get_mission(mission_id)?
        .ok_or_else(|| AgencyError::not_found("mission", mission_id))
}

/// Deletes a mission and all of its targets.
///
/// # Errors
/// - `NotFound` for a missing mission.
/// - `Conflict` while a cat is assigned.
pub fn delete(ctx: &RepoContext<'_>, mission_id: MissionId) -> AgencyResult<()> {
    let mission = ctx
        .missions()
        .get_mission(mission_id)?
        .ok_or_else(|| AgencyError::not_found("mission", mission_id))?;

    if let Some(cat_id) = mission.cat_id {
        return Err(AgencyError::Conflict(format!(
            "mission {mission_id} is assigned to cat {cat_id} and cannot be deleted"
        )));
    }

    let removed = ctx.targets().delete_for_mission(mission_id)?;
    ctx.missions().delete_mission(mission_id)?;
    info!(
        "event=mission_delete module=mission status=ok mission_id={mission_id} targets_removed={removed}"
    );
    Ok(())
}

/// Completes the mission when every target is completed.
///
/// Returns `true` when this call flipped the mission to completed, `false`
/// when it was not ready or already completed.
///
/// On completion: sets `is_completed`, `completed_at = now`, defaults
/// `end_date` to `now`, and releases the assigned cat on both sides.
pub fn check_and_complete(
    ctx: &RepoContext<'_>,
    mission_id: MissionId,
    now: i64,
) -> AgencyResult<bool> {
    let mission = ctx
        .missions()
        .get_mission(mission_id)?
        .ok_or_else(|| AgencyError::not_found("mission", mission_id))?;

    if !mission.is_ready_to_complete() {
        return Ok(false);
    }

    ctx.missions().mark_completed(mission_id, now)?;
    if let Some(cat_id) = mission.cat_id {
        assignment::unassign(ctx, mission_id, cat_id)?;
    }

    info!(
        "event=mission_complete module=mission status=ok mission_id={mission_id} released_cat_id={:?}",
        mission.cat_id
    );
    Ok(true)
}

/// Cats with no current mission.
pub fn free_cats(ctx: &RepoContext<'_>) -> AgencyResult<Vec<Cat>> {
    Ok(ctx.cats().list_free_cats()?)
}

/// Mission currently referencing `cat_id`, found by scanning all missions.
///
/// Returns `None` when no mission references the cat.
pub fn mission_for_cat(ctx: &RepoContext<'_>, cat_id: CatId) -> AgencyResult<Option<Mission>> {
    let missions = ctx.missions().list_missions()?;
    Ok(missions
        .into_iter()
        .find(|mission| mission.is_assigned_to(cat_id)))
}
