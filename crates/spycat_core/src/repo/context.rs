//! Transaction-scoped repository context.
//!
//! # Responsibility
//! - Bind cat/mission/target repositories to one connection or transaction.
//! - Run multi-entity writes inside a single `IMMEDIATE` transaction.
//!
//! # Invariants
//! - Lifecycle functions receive the context explicitly; there is no
//!   ambient transaction state.
//! - An `Err` returned from the closure rolls the transaction back.

use super::cat_repo::SqliteCatRepository;
use super::mission_repo::SqliteMissionRepository;
use super::target_repo::SqliteTargetRepository;
use super::RepoError;
use log::debug;
use rusqlite::{Connection, TransactionBehavior};

/// Repository bundle sharing one connection (or open transaction).
#[derive(Clone, Copy)]
pub struct RepoContext<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RepoContext<'conn> {
    /// Wraps a connection. Pass a `&Transaction` to scope writes to it.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, for batch statements outside the repositories.
    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    pub fn cats(&self) -> SqliteCatRepository<'conn> {
        SqliteCatRepository::new(self.conn)
    }

    pub fn missions(&self) -> SqliteMissionRepository<'conn> {
        SqliteMissionRepository::new(self.conn)
    }

    pub fn targets(&self) -> SqliteTargetRepository<'conn> {
        SqliteTargetRepository::new(self.conn)
    }
}

/// Runs `op` inside one `IMMEDIATE` transaction and commits on `Ok`.
///
/// `label` only tags the debug log lines.
pub fn run_in_transaction<T, E>(
    conn: &mut Connection,
    label: &'static str,
    op: impl FnOnce(&RepoContext<'_>) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<RepoError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(RepoError::from)?;

    let output = match op(&RepoContext::new(&tx)) {
        Ok(output) => output,
        Err(err) => {
            debug!("event=tx_rollback module=repo status=ok op={label}");
            return Err(err);
        }
    };

    tx.commit().map_err(RepoError::from)?;
    debug!("event=tx_commit module=repo status=ok op={label}");
    Ok(output)
}
