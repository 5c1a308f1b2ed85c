//! Target lifecycle rules.
//!
//! # Responsibility
//! - Guard status/notes mutations by ownership and status monotonicity.
//! - Guard target add/remove by the per-mission count bounds.
//!
//! # Invariants
//! - A `completed` target never changes status or notes again.
//! - Only the cat currently assigned to the owning mission mutates a target.
//! - `init` targets cannot be removed; the last target cannot be removed.
//! - A mission never holds more than `MAX_TARGETS` targets.
//!
//! Functions take an explicit `RepoContext`; the façade decides the
//! transaction boundaries.

use super::error::{AgencyError, AgencyResult};
use crate::model::mission::Mission;
use crate::model::target::{normalize_notes, NewTarget, Target, TargetStatus};
use crate::model::{CatId, MissionId, TargetId, MAX_TARGETS};
use crate::repo::context::RepoContext;
use crate::repo::mission_repo::MissionRepository;
use crate::repo::target_repo::TargetRepository;
use log::info;

/// Moves a target to `new_status` on behalf of `acting_cat_id`.
///
/// Does not run mission completion; see `MissionService::update_target_status`.
///
/// # Errors
/// - `NotFound` for a missing target.
/// - `InvalidTransition` when the target is completed or the move goes backwards.
/// - `Forbidden` when the owning mission is not assigned to the acting cat.
pub fn update_status(
    ctx: &RepoContext<'_>,
    target_id: TargetId,
    acting_cat_id: CatId,
    new_status: TargetStatus,
) -> AgencyResult<Target> {
    let target = load_target(ctx, target_id)?;
    ensure_not_terminal(&target)?;
    ensure_owned_by(ctx, &target, acting_cat_id)?;

    if !target.status.can_transition_to(new_status) {
        return Err(AgencyError::InvalidTransition(format!(
            "target {target_id} cannot move from `{}` back to `{new_status}`",
            target.status
        )));
    }

    ctx.targets().update_status(target_id, new_status)?;
    info!(
        "event=target_status module=target status=ok target_id={target_id} mission_id={} from={} to={new_status}",
        target.mission_id, target.status
    );
    load_target(ctx, target_id)
}

/// Replaces target notes on behalf of `acting_cat_id`. Blank notes clear them.
///
/// # Errors
/// Same as [`update_status`], plus `Validation` for oversized notes.
pub fn update_notes(
    ctx: &RepoContext<'_>,
    target_id: TargetId,
    acting_cat_id: CatId,
    notes: Option<&str>,
) -> AgencyResult<Target> {
    let notes = normalize_notes(notes)?;
    let target = load_target(ctx, target_id)?;
    ensure_not_terminal(&target)?;
    ensure_owned_by(ctx, &target, acting_cat_id)?;

    ctx.targets().update_notes(target_id, notes.as_deref())?;
    info!(
        "event=target_notes module=target status=ok target_id={target_id} mission_id={} cleared={}",
        target.mission_id,
        notes.is_none()
    );
    load_target(ctx, target_id)
}

/// Removes one target from its mission (soft delete).
///
/// # Errors
/// - `NotFound` when the target is missing or belongs to another mission.
/// - `InvalidState` when the target is still `init`.
/// - `InvariantViolation` when it is the mission's last target.
pub fn delete(ctx: &RepoContext<'_>, mission_id: MissionId, target_id: TargetId) -> AgencyResult<()> {
    let target = ctx
        .targets()
        .get_target(target_id)?
        .filter(|target| target.mission_id == mission_id)
        .ok_or_else(|| AgencyError::not_found("target", target_id))?;

    if !target.is_removable() {
        return Err(AgencyError::InvalidState(format!(
            "target {target_id} is still `init`; it must make progress before removal"
        )));
    }

    let mission = load_mission(ctx, mission_id)?;
    if !mission.can_remove_target() {
        return Err(AgencyError::InvariantViolation(format!(
            "mission {mission_id} must keep at least one target"
        )));
    }

    ctx.targets().soft_delete_target(target_id)?;
    info!(
        "event=target_delete module=target status=ok target_id={target_id} mission_id={mission_id} remaining={}",
        mission.targets.len() - 1
    );
    Ok(())
}

/// Adds one `init` target to an existing mission.
///
/// # Errors
/// - `Validation` for bad name/country/notes.
/// - `NotFound` for a missing mission.
/// - `InvalidState` when the mission is already completed.
/// - `InvariantViolation` when the mission already has `MAX_TARGETS` targets.
/// - `Conflict` when a target with the same name exists.
pub fn add(ctx: &RepoContext<'_>, mission_id: MissionId, request: &NewTarget) -> AgencyResult<Target> {
    let request = request.normalized()?;
    let mission = load_mission(ctx, mission_id)?;

    if mission.is_completed {
        return Err(AgencyError::InvalidState(format!(
            "mission {mission_id} is completed; no targets can be added"
        )));
    }
    if !mission.can_add_target() {
        return Err(AgencyError::InvariantViolation(format!(
            "mission {mission_id} already has the maximum of {MAX_TARGETS} targets"
        )));
    }
    if mission.has_target_named(&request.name) {
        return Err(duplicate_name(mission_id, &request.name));
    }

    let target = ctx
        .targets()
        .insert_target(mission_id, &request)
        .map_err(|err| {
            if err.is_constraint_violation() {
                duplicate_name(mission_id, &request.name)
            } else {
                AgencyError::from(err)
            }
        })?;

    info!(
        "event=target_add module=target status=ok target_id={} mission_id={mission_id}",
        target.id
    );
    Ok(target)
}

fn duplicate_name(mission_id: MissionId, name: &str) -> AgencyError {
    AgencyError::Conflict(format!(
        "target with name `{name}` already exists in mission {mission_id}"
    ))
}

fn load_target(ctx: &RepoContext<'_>, target_id: TargetId) -> AgencyResult<Target> {
    ctx.targets()
        .get_target(target_id)?
        .ok_or_else(|| AgencyError::not_found("target", target_id))
}

fn load_mission(ctx: &RepoContext<'_>, mission_id: MissionId) -> AgencyResult<Mission> {
    ctx.missions()
        .get_mission(mission_id)?
        .ok_or_else(|| AgencyError::not_found("mission", mission_id))
}

fn ensure_not_terminal(target: &Target) -> AgencyResult<()> {
    if target.is_completed() {
        return Err(AgencyError::InvalidTransition(format!(
            "target {} is completed and can no longer be modified",
            target.id
        )));
    }
    Ok(())
}

fn ensure_owned_by(ctx: &RepoContext<'_>, target: &Target, cat_id: CatId) -> AgencyResult<()> {
    let mission = load_mission(ctx, target.mission_id)?;
    if !mission.is_assigned_to(cat_id) {
        return Err(AgencyError::Forbidden(format!(
            "target {} does not belong to the mission of cat {cat_id}",
            target.id
        )));
    }
    Ok(())
}
