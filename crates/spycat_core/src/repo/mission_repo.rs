//! Mission repository contract and SQLite implementation.
//!
//! # Invariants
//! - Loaded missions carry their active targets ordered by creation.
//! - `assign_cat`/`clear_cat` are the only writes touching `missions.cat_id`.
//! - `mark_completed` never clears `is_completed` once set.

use super::target_repo::{SqliteTargetRepository, TargetRepository};
use super::{bool_to_int, int_to_bool, RepoError, RepoResult, NOW_MS_SQL};
use crate::model::mission::{Mission, NewMission};
use crate::model::{CatId, MissionId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MISSION_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    start_date,
    end_date,
    cat_id,
    is_completed,
    completed_at,
    created_at,
    updated_at
FROM missions";

/// Repository interface for mission persistence.
pub trait MissionRepository {
    /// Inserts the mission row only; targets are written separately.
    fn insert_mission(&self, mission: &NewMission) -> RepoResult<MissionId>;
    fn get_mission(&self, id: MissionId) -> RepoResult<Option<Mission>>;
    /// All missions ordered by `id ASC`, each with its targets.
    fn list_missions(&self) -> RepoResult<Vec<Mission>>;
    fn delete_mission(&self, id: MissionId) -> RepoResult<()>;
    /// Writes the mission side of the Cat<->Mission link and the start date.
    fn assign_cat(&self, id: MissionId, cat_id: CatId, started_at: i64) -> RepoResult<()>;
    /// Clears the mission side of the Cat<->Mission link.
    fn clear_cat(&self, id: MissionId) -> RepoResult<()>;
    /// Flags the mission completed and fills `end_date` when unset.
    fn mark_completed(&self, id: MissionId, completed_at: i64) -> RepoResult<()>;
}

/// SQLite-backed mission repository.
pub struct SqliteMissionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMissionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn with_targets(&self, mut mission: Mission) -> RepoResult<Mission> {
        mission.targets = SqliteTargetRepository::new(self.conn).list_for_mission(mission.id)?;
        Ok(mission)
    }

    fn expect_changed(&self, changed: usize, id: MissionId) -> RepoResult<()> {
        if changed == 0 {
            return Err(RepoError::not_found("mission", id));
        }
        Ok(())
    }
}

impl MissionRepository for SqliteMissionRepository<'_> {
    fn insert_mission(&self, mission: &NewMission) -> RepoResult<MissionId> {
        self.conn.execute(
            "INSERT INTO missions (name, description, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                mission.name.as_str(),
                mission.description.as_str(),
                mission.start_date,
                mission.end_date,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_mission(&self, id: MissionId) -> RepoResult<Option<Mission>> {
        let sql = format!("{MISSION_SELECT_SQL} WHERE id = ?1;");
        let mission = self
            .conn
            .query_row(&sql, [id], |row| Ok(parse_mission_row(row)))
            .optional()?
            .transpose()?;

        match mission {
            Some(mission) => Ok(Some(self.with_targets(mission)?)),
            None => Ok(None),
        }
    }

    fn list_missions(&self) -> RepoResult<Vec<Mission>> {
        let sql = format!("{MISSION_SELECT_SQL} ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut missions = Vec::new();
        while let Some(row) = rows.next()? {
            missions.push(parse_mission_row(row)?);
        }

        missions
            .into_iter()
            .map(|mission| self.with_targets(mission))
            .collect()
    }

    fn delete_mission(&self, id: MissionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM missions WHERE id = ?1;", [id])?;
        self.expect_changed(changed, id)
    }

    fn assign_cat(&self, id: MissionId, cat_id: CatId, started_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE missions
                 SET cat_id = ?2, start_date = ?3, updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, cat_id, started_at],
        )?;
        self.expect_changed(changed, id)
    }

    fn clear_cat(&self, id: MissionId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("UPDATE missions SET cat_id = NULL, updated_at = {NOW_MS_SQL} WHERE id = ?1;"),
            [id],
        )?;
        self.expect_changed(changed, id)
    }

    fn mark_completed(&self, id: MissionId, completed_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE missions
                 SET
                    is_completed = ?2,
                    completed_at = ?3,
                    end_date = COALESCE(end_date, ?3),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, bool_to_int(true), completed_at],
        )?;
        self.expect_changed(changed, id)
    }
}

fn parse_mission_row(row: &Row<'_>) -> RepoResult<Mission> {
    let start_date: Option<i64> = row.get("start_date")?;
    let end_date: Option<i64> = row.get("end_date")?;
    Ok(Mission {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        start_date,
        end_date,
        cat_id: row.get("cat_id")?,
        is_completed: int_to_bool("missions.is_completed", row.get("is_completed")?)?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        targets: Vec::new(),
    })
}
