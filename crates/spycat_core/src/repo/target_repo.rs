//! Target repository contract and SQLite implementation.
//!
//! # Invariants
//! - Reads only see rows with `deleted_at IS NULL`.
//! - New targets always start at `init`.
//! - Per-mission order is creation order (`id ASC`).

use super::{RepoError, RepoResult, NOW_MS_SQL};
use crate::model::target::{NewTarget, Target, TargetStatus};
use crate::model::{MissionId, TargetId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TARGET_SELECT_SQL: &str = "SELECT
    id,
    mission_id,
    name,
    country,
    notes,
    status,
    created_at,
    updated_at
FROM targets";

/// Repository interface for target persistence.
pub trait TargetRepository {
    fn insert_target(&self, mission_id: MissionId, target: &NewTarget) -> RepoResult<Target>;
    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>>;
    fn list_for_mission(&self, mission_id: MissionId) -> RepoResult<Vec<Target>>;
    fn update_status(&self, id: TargetId, status: TargetStatus) -> RepoResult<()>;
    fn update_notes(&self, id: TargetId, notes: Option<&str>) -> RepoResult<()>;
    /// Tombstones one target; it disappears from every read.
    fn soft_delete_target(&self, id: TargetId) -> RepoResult<()>;
    /// Physically removes every target row of a mission, tombstoned or not.
    fn delete_for_mission(&self, mission_id: MissionId) -> RepoResult<usize>;
}

/// SQLite-backed target repository.
pub struct SqliteTargetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTargetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn expect_changed(&self, changed: usize, id: TargetId) -> RepoResult<()> {
        if changed == 0 {
            return Err(RepoError::not_found("target", id));
        }
        Ok(())
    }
}

impl TargetRepository for SqliteTargetRepository<'_> {
    fn insert_target(&self, mission_id: MissionId, target: &NewTarget) -> RepoResult<Target> {
        self.conn.execute(
            "INSERT INTO targets (mission_id, name, country, notes, status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                mission_id,
                target.name.as_str(),
                target.country.as_str(),
                target.notes.as_deref(),
                TargetStatus::Init.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_target(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("target {id} missing right after insert")))
    }

    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>> {
        let sql = format!("{TARGET_SELECT_SQL} WHERE id = ?1 AND deleted_at IS NULL;");
        let target = self
            .conn
            .query_row(&sql, [id], |row| Ok(parse_target_row(row)))
            .optional()?;
        target.transpose()
    }

    fn list_for_mission(&self, mission_id: MissionId) -> RepoResult<Vec<Target>> {
        let sql = format!(
            "{TARGET_SELECT_SQL}
             WHERE mission_id = ?1 AND deleted_at IS NULL
             ORDER BY id ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([mission_id])?;
        let mut targets = Vec::new();
        while let Some(row) = rows.next()? {
            targets.push(parse_target_row(row)?);
        }
        Ok(targets)
    }

    fn update_status(&self, id: TargetId, status: TargetStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE targets SET status = ?2, updated_at = {NOW_MS_SQL}
                 WHERE id = ?1 AND deleted_at IS NULL;"
            ),
            params![id, status.as_str()],
        )?;
        self.expect_changed(changed, id)
    }

    fn update_notes(&self, id: TargetId, notes: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE targets SET notes = ?2, updated_at = {NOW_MS_SQL}
                 WHERE id = ?1 AND deleted_at IS NULL;"
            ),
            params![id, notes],
        )?;
        self.expect_changed(changed, id)
    }

    fn soft_delete_target(&self, id: TargetId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE targets SET deleted_at = {NOW_MS_SQL}, updated_at = {NOW_MS_SQL}
                 WHERE id = ?1 AND deleted_at IS NULL;"
            ),
            [id],
        )?;
        self.expect_changed(changed, id)
    }

    fn delete_for_mission(&self, mission_id: MissionId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM targets WHERE mission_id = ?1;", [mission_id])?;
        Ok(removed)
    }
}

fn parse_target_row(row: &Row<'_>) -> RepoResult<Target> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TargetStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in targets.status"))
    })?;

    Ok(Target {
        id: row.get("id")?,
        mission_id: row.get("mission_id")?,
        name: row.get("name")?,
        country: row.get("country")?,
        notes: row.get("notes")?,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
