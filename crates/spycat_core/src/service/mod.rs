//! Core use-case services.
//!
//! # Responsibility
//! - Lifecycle rules for targets and missions, and the assignment coordinator.
//! - Façades (`MissionService`, `CatService`) owning transaction boundaries.
//! - Keep boundary adapters decoupled from storage details.

pub mod assignment;
pub mod cat_service;
pub mod error;
pub mod mission_lifecycle;
pub mod mission_service;
pub mod target_lifecycle;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
