//! Core domain logic for the Spy Cat Agency.
//! This crate owns every mission lifecycle invariant; transports only map
//! requests onto [`MissionService`] and [`CatService`].

pub mod breed;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use breed::{
    Breed, BreedCatalog, BreedError, BreedSnapshot, BreedSource, CachedBreedCatalog,
    StaticBreedSource, DEFAULT_BREED_CACHE_TTL,
};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::cat::{Cat, NewCat};
pub use model::mission::{Mission, NewMission};
pub use model::target::{NewTarget, Target, TargetStatus};
pub use model::{CatId, MissionId, TargetId, ValidationError};
pub use repo::context::{run_in_transaction, RepoContext};
pub use repo::{RepoError, RepoResult};
pub use seed::{seed_demo_data, SeedSummary};
pub use service::cat_service::{CatPage, CatService};
pub use service::error::{AgencyError, AgencyResult, ErrorKind};
pub use service::mission_service::MissionService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
