//! Shared handler state.
//!
//! # Invariants
//! - The connection mutex is never held across a breed catalog call.

use crate::error::ApiError;
use log::error;
use rusqlite::Connection;
use spycat_core::{AgencyResult, BreedCatalog, BreedSnapshot};
use std::sync::{Arc, Mutex, PoisonError};

pub type SharedState = Arc<AppState>;

/// One SQLite connection behind a mutex plus the injected breed catalog.
pub struct AppState {
    db: Mutex<Connection>,
    catalog: Arc<dyn BreedCatalog>,
}

impl AppState {
    pub fn new(conn: Connection, catalog: Arc<dyn BreedCatalog>) -> Self {
        Self {
            db: Mutex::new(conn),
            catalog,
        }
    }

    /// Runs `op` with exclusive access to the connection on the blocking pool.
    pub async fn run<T, F>(self: &Arc<Self>, label: &'static str, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> AgencyResult<T> + Send + 'static,
    {
        let state = Arc::clone(self);
        blocking(label, move || {
            let mut conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
            op(&mut *conn)
        })
        .await
    }

    /// Resolves the breed list on the blocking pool without touching the
    /// connection.
    pub async fn breeds(self: &Arc<Self>, label: &'static str) -> Result<BreedSnapshot, ApiError> {
        let state = Arc::clone(self);
        blocking(label, move || {
            Ok(BreedSnapshot::resolve(state.catalog.as_ref())?)
        })
        .await
    }

    /// Resolves breeds first, then runs `op` under the connection lock.
    pub async fn run_with_breeds<T, F>(
        self: &Arc<Self>,
        label: &'static str,
        op: F,
    ) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &BreedSnapshot) -> AgencyResult<T> + Send + 'static,
    {
        let breeds = self.breeds(label).await?;
        self.run(label, move |conn| op(conn, &breeds)).await
    }
}

async fn blocking<T, F>(label: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> AgencyResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => {
            error!("event=blocking_task module=server status=error op={label} error={err}");
            Err(ApiError::Internal(format!("{label} task failed")))
        }
    }
}
