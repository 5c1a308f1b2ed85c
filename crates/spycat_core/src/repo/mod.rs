//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define data access contracts for cats, missions and targets.
//! - Keep SQL details out of lifecycle services.
//! - Provide the transaction-scoped `RepoContext` handed to lifecycle code.
//!
//! # Invariants
//! - Repositories never enforce lifecycle rules; services do.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Soft-deleted targets are invisible to every read.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cat_repo;
pub mod context;
pub mod mission_repo;
pub mod target_repo;

/// Millisecond-precision "now" evaluated by SQLite.
pub(crate) const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for agency persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns whether the database rejected the write on a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(column: &str, value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
