//! Mission/target command and query façade.
//!
//! # Responsibility
//! - Expose agency use-cases over one SQLite connection.
//! - Decide transaction boundaries for lifecycle operations.
//!
//! # Invariants
//! - Every multi-row mutation runs in one `IMMEDIATE` transaction.
//! - Reads run outside explicit transactions.
//! - Mission auto-completion after a status update is best effort: its
//!   failure is logged and never fails the status update.

use super::error::{AgencyError, AgencyResult};
use super::{assignment, mission_lifecycle, now_epoch_ms, target_lifecycle};
use crate::model::cat::Cat;
use crate::model::mission::{Mission, NewMission};
use crate::model::target::{NewTarget, Target, TargetStatus};
use crate::model::{CatId, MissionId, TargetId};
use crate::repo::context::{run_in_transaction, RepoContext};
use crate::repo::mission_repo::MissionRepository;
use log::error;
use rusqlite::Connection;

/// Mission use-case service bound to one connection.
pub struct MissionService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> MissionService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn read(&self) -> RepoContext<'_> {
        RepoContext::new(&*self.conn)
    }

    /// Creates a mission with 1..=3 targets, all-or-nothing.
    pub fn create_mission(&mut self, request: &NewMission) -> AgencyResult<Mission> {
        run_in_transaction(self.conn, "mission_create", |ctx| {
            mission_lifecycle::create(ctx, request)
        })
    }

    /// Lists all missions (`id ASC`) with their targets.
    pub fn list_missions(&self) -> AgencyResult<Vec<Mission>> {
        Ok(self.read().missions().list_missions()?)
    }

    pub fn get_mission(&self, mission_id: MissionId) -> AgencyResult<Mission> {
        self.read()
            .missions()
            .get_mission(mission_id)?
            .ok_or_else(|| AgencyError::not_found("mission", mission_id))
    }

    /// Deletes an unassigned mission and its targets.
    pub fn delete_mission(&mut self, mission_id: MissionId) -> AgencyResult<()> {
        run_in_transaction(self.conn, "mission_delete", |ctx| {
            mission_lifecycle::delete(ctx, mission_id)
        })
    }

    /// Assigns `cat_id` to `mission_id` and returns the updated mission.
    ///
    /// Cat availability is not checked (see the assignment coordinator).
    pub fn assign_cat(&mut self, mission_id: MissionId, cat_id: CatId) -> AgencyResult<Mission> {
        run_in_transaction(self.conn, "cat_assign", |ctx| {
            assignment::assign(ctx, mission_id, cat_id, now_epoch_ms())
        })?;
        self.get_mission(mission_id)
    }

    /// Releases the cat assigned to `mission_id` and returns the mission.
    ///
    /// # Errors
    /// - `NotFound` for a missing mission.
    /// - `InvalidState` when no cat is assigned.
    pub fn unassign_cat(&mut self, mission_id: MissionId) -> AgencyResult<Mission> {
        run_in_transaction(self.conn, "cat_unassign", |ctx| -> AgencyResult<()> {
            let mission = ctx
                .missions()
                .get_mission(mission_id)?
                .ok_or_else(|| AgencyError::not_found("mission", mission_id))?;
            let cat_id = mission.cat_id.ok_or_else(|| {
                AgencyError::InvalidState(format!("mission {mission_id} has no assigned cat"))
            })?;
            assignment::unassign(ctx, mission_id, cat_id)
        })?;
        self.get_mission(mission_id)
    }

    pub fn free_cats(&self) -> AgencyResult<Vec<Cat>> {
        mission_lifecycle::free_cats(&self.read())
    }

    pub fn add_target(&mut self, mission_id: MissionId, request: &NewTarget) -> AgencyResult<Target> {
        run_in_transaction(self.conn, "target_add", |ctx| {
            target_lifecycle::add(ctx, mission_id, request)
        })
    }

    pub fn delete_target(&mut self, mission_id: MissionId, target_id: TargetId) -> AgencyResult<()> {
        run_in_transaction(self.conn, "target_delete", |ctx| {
            target_lifecycle::delete(ctx, mission_id, target_id)
        })
    }

    /// Mission currently assigned to `cat_id`, if any.
    pub fn mission_for_cat(&self, cat_id: CatId) -> AgencyResult<Option<Mission>> {
        mission_lifecycle::mission_for_cat(&self.read(), cat_id)
    }

    /// Updates a target status, then tries to complete its mission when the
    /// new status is `completed`.
    pub fn update_target_status(
        &mut self,
        cat_id: CatId,
        target_id: TargetId,
        status: TargetStatus,
    ) -> AgencyResult<Target> {
        let target = run_in_transaction(self.conn, "target_status", |ctx| {
            target_lifecycle::update_status(ctx, target_id, cat_id, status)
        })?;

        if status == TargetStatus::Completed {
            if let Err(err) = self.check_and_complete(target.mission_id) {
                error!(
                    "event=mission_complete module=mission status=error mission_id={} target_id={target_id} error_kind={} error={}",
                    target.mission_id,
                    err.kind().as_str(),
                    err
                );
            }
        }

        Ok(target)
    }

    pub fn update_target_notes(
        &mut self,
        cat_id: CatId,
        target_id: TargetId,
        notes: Option<&str>,
    ) -> AgencyResult<Target> {
        run_in_transaction(self.conn, "target_notes", |ctx| {
            target_lifecycle::update_notes(ctx, target_id, cat_id, notes)
        })
    }

    /// Completes `mission_id` if all of its targets are completed.
    ///
    /// Returns whether this call completed the mission. Idempotent.
    pub fn check_and_complete(&mut self, mission_id: MissionId) -> AgencyResult<bool> {
        run_in_transaction(self.conn, "mission_complete", |ctx| {
            mission_lifecycle::check_and_complete(ctx, mission_id, now_epoch_ms())
        })
    }
}
