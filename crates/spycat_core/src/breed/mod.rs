//! Breed catalog contracts.
//!
//! # Responsibility
//! - Describe the external breed list used to validate new cats.
//! - Provide a read-through TTL cache in front of any breed source.
//!
//! # Invariants
//! - Breed names match exactly (case-sensitive), as published by the source.
//! - The catalog is injected where needed; there is no process-global cache.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod cache;

pub use cache::{CachedBreedCatalog, DEFAULT_BREED_CACHE_TTL};

/// One breed entry as published by the breed catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
}

/// Failure reaching or decoding the breed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreedError {
    /// Transport failure or non-success status.
    Unavailable(String),
    /// Response body could not be decoded.
    InvalidResponse(String),
}

impl Display for BreedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "breed catalog unavailable: {message}"),
            Self::InvalidResponse(message) => {
                write!(f, "breed catalog returned invalid data: {message}")
            }
        }
    }
}

impl Error for BreedError {}

/// Upstream provider of the full breed list. Called on cache misses only.
pub trait BreedSource: Send + Sync {
    fn fetch_breeds(&self) -> Result<Vec<Breed>, BreedError>;
}

/// Query interface consumed by the cat service.
pub trait BreedCatalog: Send + Sync {
    fn list_breed_names(&self) -> Result<Vec<String>, BreedError>;
    fn is_valid_breed(&self, name: &str) -> Result<bool, BreedError>;
}

/// Fixed in-process breed list for tests, seeding and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticBreedSource {
    breeds: Vec<Breed>,
}

impl StaticBreedSource {
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let breeds = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| Breed {
                id: name.chars().take(4).collect::<String>().to_ascii_lowercase(),
                name,
            })
            .collect();
        Self { breeds }
    }
}

impl BreedSource for StaticBreedSource {
    fn fetch_breeds(&self) -> Result<Vec<Breed>, BreedError> {
        Ok(self.breeds.clone())
    }
}

/// Breed names resolved once from a catalog.
///
/// Answers every query from memory, so holding one never reaches the
/// upstream source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedSnapshot {
    names: Vec<String>,
}

impl BreedSnapshot {
    pub fn resolve<C: BreedCatalog + ?Sized>(catalog: &C) -> Result<Self, BreedError> {
        Ok(Self {
            names: catalog.list_breed_names()?,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl BreedCatalog for BreedSnapshot {
    fn list_breed_names(&self) -> Result<Vec<String>, BreedError> {
        Ok(self.names.clone())
    }

    fn is_valid_breed(&self, name: &str) -> Result<bool, BreedError> {
        Ok(self.names.iter().any(|breed| breed == name))
    }
}
