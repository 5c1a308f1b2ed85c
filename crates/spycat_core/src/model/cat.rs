//! Spy cat domain model.
//!
//! # Invariants
//! - `mission_id` is written only by the assignment coordinator.
//! - A cat with `mission_id` set cannot be deleted.

use super::{normalize_required_text, CatId, MissionId, ValidationError, NAME_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// Persisted spy cat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: CatId,
    pub name: String,
    pub years_of_experience: i32,
    /// Breed name as listed by the breed catalog.
    pub breed: String,
    pub salary: f64,
    /// Mission the cat currently works on, if any.
    pub mission_id: Option<MissionId>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Cat {
    /// A free cat has no current mission.
    pub fn is_free(&self) -> bool {
        self.mission_id.is_none()
    }
}

/// Inbound data for cat creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
}

impl NewCat {
    /// Returns a trimmed copy, or the first field violation.
    ///
    /// Breed membership in the catalog is checked by the cat service, not here.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.years_of_experience < 0 {
            return Err(ValidationError::Negative("years of experience"));
        }
        Ok(Self {
            name: normalize_required_text("cat name", &self.name, NAME_MAX_CHARS)?,
            years_of_experience: self.years_of_experience,
            breed: normalize_required_text("cat breed", &self.breed, NAME_MAX_CHARS)?,
            salary: validate_salary(self.salary)?,
        })
    }
}

/// Salaries are finite and non-negative.
pub fn validate_salary(salary: f64) -> Result<f64, ValidationError> {
    if !salary.is_finite() {
        return Err(ValidationError::NotFinite("salary"));
    }
    if salary < 0.0 {
        return Err(ValidationError::Negative("salary"));
    }
    Ok(salary)
}

#[cfg(test)]
mod tests {
    use super::{validate_salary, NewCat};
    use crate::model::ValidationError;

    fn new_cat() -> NewCat {
        NewCat {
            name: " Jane ".to_string(),
            years_of_experience: 5,
            breed: "Abyssinian".to_string(),
            salary: 50_000.0,
        }
    }

    #[test]
    fn normalized_trims_name() {
        assert_eq!(new_cat().normalized().unwrap().name, "Jane");
    }

    #[test]
    fn negative_experience_is_rejected() {
        let cat = NewCat {
            years_of_experience: -1,
            ..new_cat()
        };
        assert_eq!(
            cat.normalized().unwrap_err(),
            ValidationError::Negative("years of experience")
        );
    }

    #[test]
    fn salary_must_be_finite_and_non_negative() {
        assert_eq!(validate_salary(0.0), Ok(0.0));
        assert_eq!(validate_salary(-0.5), Err(ValidationError::Negative("salary")));
        assert_eq!(
            validate_salary(f64::NAN),
            Err(ValidationError::NotFinite("salary"))
        );
    }
}
