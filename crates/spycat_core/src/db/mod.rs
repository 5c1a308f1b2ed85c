//! Agency store: one SQLite file holding `spy_cats`, `missions` and
//! `targets`.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`; a file newer than this
//!   binary is refused instead of downgraded.
//! - `spy_cats.mission_id` and `missions.cat_id` reference each other, both
//!   `ON DELETE SET NULL`. Only the assignment service keeps the pair in
//!   step, so foreign keys must stay enabled on every connection.
//! - Targets cascade with their mission and are otherwise soft-deleted.
//! - Constraint failures surface as `DbError::Sqlite`; callers classify
//!   them through `is_constraint_violation`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether the failure came from a SQLite constraint check
    /// (unique index, `CHECK`, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
