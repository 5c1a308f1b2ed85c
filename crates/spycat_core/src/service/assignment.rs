//! Assignment coordinator for the Cat<->Mission link.
//!
//! # Responsibility
//! - Write both sides of the link (`missions.cat_id`, `spy_cats.mission_id`)
//!   through one `RepoContext`, so the caller's transaction covers both.
//!
//! # Invariants
//! - No other module writes either side of the link.
//! - `assign` does not check that the cat is free or that the mission is
//!   unassigned; overwrites are logged at `warn`.

use super::error::{AgencyError, AgencyResult};
use crate::model::{CatId, MissionId};
use crate::repo::cat_repo::CatRepository;
use crate::repo::context::RepoContext;
use crate::repo::mission_repo::MissionRepository;
use log::{info, warn};

/// Links `cat_id` and `mission_id` and stamps the mission start date.
///
/// # Errors
/// - `NotFound` when either row is missing; nothing is written then.
pub fn assign(
    ctx: &RepoContext<'_>,
    mission_id: MissionId,
    cat_id: CatId,
    started_at: i64,
) -> AgencyResult<()> {
    let mission = ctx
        .missions()
        .get_mission(mission_id)?
        .ok_or_else(|| AgencyError::not_found("mission", mission_id))?;
    let cat = ctx
        .cats()
        .get_cat(cat_id)?
        .ok_or_else(|| AgencyError::not_found("spy cat", cat_id))?;

    if let Some(previous_cat) = mission.cat_id.filter(|previous| *previous != cat_id) {
        warn!(
            "event=cat_assign module=assignment status=overwrite mission_id={mission_id} previous_cat_id={previous_cat} cat_id={cat_id}"
        );
    }
    if let Some(previous_mission) = cat.mission_id.filter(|previous| *previous != mission_id) {
        warn!(
            "event=cat_assign module=assignment status=overwrite cat_id={cat_id} previous_mission_id={previous_mission} mission_id={mission_id}"
        );
    }

    ctx.missions().assign_cat(mission_id, cat_id, started_at)?;
    ctx.cats().set_mission(cat_id, Some(mission_id))?;

    info!("event=cat_assign module=assignment status=ok mission_id={mission_id} cat_id={cat_id}");
    Ok(())
}

/// Clears the link between `mission_id` and `cat_id` on both sides.
///
/// The cat side is only cleared while it still points at `mission_id`.
pub fn unassign(ctx: &RepoContext<'_>, mission_id: MissionId, cat_id: CatId) -> AgencyResult<()> {
    ctx.missions().clear_cat(mission_id)?;

    match ctx.cats().get_cat(cat_id)? {
        Some(cat) if cat.mission_id == Some(mission_id) => {
            ctx.cats().set_mission(cat_id, None)?;
        }
        Some(cat) => {
            warn!(
                "event=cat_unassign module=assignment status=skipped mission_id={mission_id} cat_id={cat_id} cat_mission_id={:?}",
                cat.mission_id
            );
        }
        None => {
            warn!(
                "event=cat_unassign module=assignment status=skipped mission_id={mission_id} cat_id={cat_id} reason=cat_missing"
            );
        }
    }

    info!("event=cat_unassign module=assignment status=ok mission_id={mission_id} cat_id={cat_id}");
    Ok(())
}
