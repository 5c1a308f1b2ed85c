//! Spy cat use-case service.
//!
//! # Responsibility
//! - Cat CRUD with breed validation against the injected catalog.
//! - Refuse deletion of cats still linked to a mission.
//!
//! # Invariants
//! - The cat service never writes `spy_cats.mission_id`.

use super::error::{AgencyError, AgencyResult};
use crate::breed::BreedCatalog;
use crate::model::cat::{validate_salary, Cat, NewCat};
use crate::model::{CatId, ValidationError};
use crate::repo::cat_repo::{CatListQuery, CatRepository};
use crate::repo::context::{run_in_transaction, RepoContext};
use log::info;
use rusqlite::Connection;

/// Default page size for cat listing.
pub const CATS_DEFAULT_LIMIT: u32 = 10;
/// Largest accepted page size for cat listing.
pub const CATS_LIMIT_MAX: u32 = 100;

/// One page of cats plus the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct CatPage {
    pub cats: Vec<Cat>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Cat use-case service bound to one connection and breed catalog.
pub struct CatService<'conn, C: BreedCatalog + ?Sized> {
    conn: &'conn mut Connection,
    catalog: &'conn C,
}

impl<'conn, C: BreedCatalog + ?Sized> CatService<'conn, C> {
    pub fn new(conn: &'conn mut Connection, catalog: &'conn C) -> Self {
        Self { conn, catalog }
    }

    fn read(&self) -> RepoContext<'_> {
        RepoContext::new(&*self.conn)
    }

    /// Creates a cat after checking its breed against the catalog.
    ///
    /// # Errors
    /// - `Validation` for bad fields or an unknown breed.
    /// - `ExternalService` when the catalog cannot be reached.
    pub fn create_cat(&mut self, request: &NewCat) -> AgencyResult<Cat> {
        let request = request.normalized()?;
        if !self.catalog.is_valid_breed(&request.breed)? {
            return Err(ValidationError::UnknownBreed(request.breed).into());
        }

        let cat = self.read().cats().create_cat(&request)?;
        info!(
            "event=cat_create module=cat status=ok cat_id={} breed={}",
            cat.id, cat.breed
        );
        Ok(cat)
    }

    pub fn get_cat(&self, cat_id: CatId) -> AgencyResult<Cat> {
        self.read()
            .cats()
            .get_cat(cat_id)?
            .ok_or_else(|| AgencyError::not_found("spy cat", cat_id))
    }

    /// Lists cats by `id ASC`.
    ///
    /// `limit` defaults to `CATS_DEFAULT_LIMIT` and must be in
    /// `1..=CATS_LIMIT_MAX`; `offset` defaults to 0.
    pub fn list_cats(&self, limit: Option<u32>, offset: Option<u32>) -> AgencyResult<CatPage> {
        let limit = normalize_cat_limit(limit)?;
        let offset = offset.unwrap_or(0);
        let cats = self.read().cats();
        Ok(CatPage {
            cats: cats.list_cats(&CatListQuery { limit, offset })?,
            total: cats.count_cats()?,
            limit,
            offset,
        })
    }

    pub fn update_salary(&mut self, cat_id: CatId, salary: f64) -> AgencyResult<Cat> {
        let salary = validate_salary(salary)?;
        self.read().cats().update_salary(cat_id, salary)?;
        info!("event=cat_salary module=cat status=ok cat_id={cat_id}");
        self.get_cat(cat_id)
    }

    /// Deletes a cat that is not linked to any mission.
    ///
    /// # Errors
    /// - `NotFound` for a missing cat.
    /// - `Conflict` while the cat references a mission.
    pub fn delete_cat(&mut self, cat_id: CatId) -> AgencyResult<()> {
        run_in_transaction(self.conn, "cat_delete", |ctx| -> AgencyResult<()> {
            let cat = ctx
                .cats()
                .get_cat(cat_id)?
                .ok_or_else(|| AgencyError::not_found("spy cat", cat_id))?;
            if let Some(mission_id) = cat.mission_id {
                return Err(AgencyError::Conflict(format!(
                    "cat {cat_id} is assigned to mission {mission_id}; unassign it before deletion"
                )));
            }
            ctx.cats().delete_cat(cat_id)?;
            Ok(())
        })?;
        info!("event=cat_delete module=cat status=ok cat_id={cat_id}");
        Ok(())
    }

    /// Breed names accepted by `create_cat`.
    pub fn list_breeds(&self) -> AgencyResult<Vec<String>> {
        Ok(self.catalog.list_breed_names()?)
    }
}

/// Applies the cat listing page-size contract.
pub fn normalize_cat_limit(limit: Option<u32>) -> Result<u32, ValidationError> {
    match limit {
        None => Ok(CATS_DEFAULT_LIMIT),
        Some(0) => Err(ValidationError::Pagination("limit must be a positive integer")),
        Some(value) if value > CATS_LIMIT_MAX => {
            Err(ValidationError::Pagination("limit cannot exceed 100"))
        }
        Some(value) => Ok(value),
    }
}
