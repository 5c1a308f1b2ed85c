//! REST adapter over `spycat_core`.

pub mod breeds;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use breeds::TheCatApiSource;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, SharedState};
