//! Spy cat repository contract and SQLite implementation.
//!
//! # Invariants
//! - `set_mission` is the only write touching `spy_cats.mission_id`, and is
//!   called only by the assignment coordinator.
//! - Listing order is `id ASC`.

use super::{RepoError, RepoResult, NOW_MS_SQL};
use crate::model::cat::{Cat, NewCat};
use crate::model::{CatId, MissionId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CAT_SELECT_SQL: &str = "SELECT
    id,
    name,
    years_of_experience,
    breed,
    salary,
    mission_id,
    created_at,
    updated_at
FROM spy_cats";

/// Pagination window for cat listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for CatListQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// Repository interface for spy cat persistence.
pub trait CatRepository {
    fn create_cat(&self, cat: &NewCat) -> RepoResult<Cat>;
    fn get_cat(&self, id: CatId) -> RepoResult<Option<Cat>>;
    fn list_cats(&self, query: &CatListQuery) -> RepoResult<Vec<Cat>>;
    fn count_cats(&self) -> RepoResult<u64>;
    /// Cats with no mission reference, `id ASC`.
    fn list_free_cats(&self) -> RepoResult<Vec<Cat>>;
    fn update_salary(&self, id: CatId, salary: f64) -> RepoResult<()>;
    fn delete_cat(&self, id: CatId) -> RepoResult<()>;
    /// Writes the cat side of the Cat<->Mission link.
    fn set_mission(&self, id: CatId, mission_id: Option<MissionId>) -> RepoResult<()>;
}

/// SQLite-backed spy cat repository.
pub struct SqliteCatRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_cats(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Cat>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut cats = Vec::new();
        while let Some(row) = rows.next()? {
            cats.push(parse_cat_row(row)?);
        }
        Ok(cats)
    }
}

impl CatRepository for SqliteCatRepository<'_> {
    fn create_cat(&self, cat: &NewCat) -> RepoResult<Cat> {
        self.conn.execute(
            "INSERT INTO spy_cats (name, years_of_experience, breed, salary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                cat.name.as_str(),
                cat.years_of_experience,
                cat.breed.as_str(),
                cat.salary,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_cat(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("spy cat {id} missing right after insert"))
        })
    }

    fn get_cat(&self, id: CatId) -> RepoResult<Option<Cat>> {
        let sql = format!("{CAT_SELECT_SQL} WHERE id = ?1;");
        let cat = self
            .conn
            .query_row(&sql, [id], |row| Ok(parse_cat_row(row)))
            .optional()?;
        cat.transpose()
    }

    fn list_cats(&self, query: &CatListQuery) -> RepoResult<Vec<Cat>> {
        let sql = format!("{CAT_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;");
        self.query_cats(
            &sql,
            params![i64::from(query.limit), i64::from(query.offset)],
        )
    }

    fn count_cats(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM spy_cats;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative spy cat count {count}")))
    }

    fn list_free_cats(&self) -> RepoResult<Vec<Cat>> {
        let sql = format!("{CAT_SELECT_SQL} WHERE mission_id IS NULL ORDER BY id ASC;");
        self.query_cats(&sql, [])
    }

    fn update_salary(&self, id: CatId, salary: f64) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("UPDATE spy_cats SET salary = ?2, updated_at = {NOW_MS_SQL} WHERE id = ?1;"),
            params![id, salary],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("spy cat", id));
        }
        Ok(())
    }

    fn delete_cat(&self, id: CatId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM spy_cats WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("spy cat", id));
        }
        Ok(())
    }

    fn set_mission(&self, id: CatId, mission_id: Option<MissionId>) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE spy_cats SET mission_id = ?2, updated_at = {NOW_MS_SQL} WHERE id = ?1;"
            ),
            params![id, mission_id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("spy cat", id));
        }
        Ok(())
    }
}

fn parse_cat_row(row: &Row<'_>) -> RepoResult<Cat> {
    let cat = Cat {
        id: row.get("id")?,
        name: row.get("name")?,
        years_of_experience: row.get("years_of_experience")?,
        breed: row.get("breed")?,
        salary: row.get("salary")?,
        mission_id: row.get("mission_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    if cat.years_of_experience < 0 || cat.salary < 0.0 {
        return Err(RepoError::InvalidData(format!(
            "negative experience or salary in spy_cats row {}",
            cat.id
        )));
    }
    Ok(cat)
}
