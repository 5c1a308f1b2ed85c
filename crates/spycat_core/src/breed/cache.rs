//! Read-through TTL cache over a `BreedSource`.
//!
//! # Invariants
//! - A snapshot is served while younger than the TTL and non-empty.
//! - Refresh takes the write lock and re-checks freshness before fetching,
//!   so concurrent misses trigger one upstream call.
//! - A failed refresh keeps the previous snapshot untouched.

use super::{Breed, BreedCatalog, BreedError, BreedSource};
use log::{info, warn};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Snapshot lifetime used when none is configured.
pub const DEFAULT_BREED_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

struct Snapshot {
    breeds: Arc<Vec<Breed>>,
    fetched_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.breeds.is_empty() && self.fetched_at.elapsed() < ttl
    }
}

/// Breed catalog serving a cached snapshot of `S`.
pub struct CachedBreedCatalog<S: BreedSource> {
    source: S,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: BreedSource> CachedBreedCatalog<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_BREED_CACHE_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current breed list, fetching it when the snapshot expired.
    pub fn breeds(&self) -> Result<Arc<Vec<Breed>>, BreedError> {
        {
            let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(snapshot) = guard.as_ref().filter(|s| s.is_fresh(self.ttl)) {
                return Ok(Arc::clone(&snapshot.breeds));
            }
        }

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = guard.as_ref().filter(|s| s.is_fresh(self.ttl)) {
            return Ok(Arc::clone(&snapshot.breeds));
        }

        let started_at = Instant::now();
        let breeds = match self.source.fetch_breeds() {
            Ok(breeds) => Arc::new(breeds),
            Err(err) => {
                warn!(
                    "event=breed_refresh module=breed status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };
        info!(
            "event=breed_refresh module=breed status=ok count={} duration_ms={}",
            breeds.len(),
            started_at.elapsed().as_millis()
        );

        *guard = Some(Snapshot {
            breeds: Arc::clone(&breeds),
            fetched_at: Instant::now(),
        });
        Ok(breeds)
    }
}

impl<S: BreedSource> BreedCatalog for CachedBreedCatalog<S> {
    fn list_breed_names(&self) -> Result<Vec<String>, BreedError> {
        Ok(self.breeds()?.iter().map(|breed| breed.name.clone()).collect())
    }

    fn is_valid_breed(&self, name: &str) -> Result<bool, BreedError> {
        Ok(self.breeds()?.iter().any(|breed| breed.name == name))
    }
}
