//! Agency error taxonomy shared by lifecycle services and the façade.
//!
//! # Invariants
//! - Every failure maps to exactly one `ErrorKind`.
//! - `Internal` wraps persistence failures; callers must not echo their text
//!   to end users.

use crate::breed::BreedError;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AgencyResult<T> = Result<T, AgencyError>;

/// Coarse error category used by boundary adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    InvalidState,
    InvalidTransition,
    InvariantViolation,
    ExternalService,
    Internal,
}

impl ErrorKind {
    /// Stable snake_case label for logs and response bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::InvalidState => "invalid_state",
            Self::InvalidTransition => "invalid_transition",
            Self::InvariantViolation => "invariant_violation",
            Self::ExternalService => "external_service_error",
            Self::Internal => "internal_error",
        }
    }

    /// Lifecycle rule violations share one category at the boundary.
    pub fn is_lifecycle_violation(self) -> bool {
        matches!(self, Self::InvalidState | Self::InvalidTransition)
    }
}

/// Errors returned by agency use-cases.
#[derive(Debug)]
pub enum AgencyError {
    /// Malformed or out-of-range input.
    Validation(ValidationError),
    /// Referenced entity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Current state prevents the operation (assigned cat, duplicate name).
    Conflict(String),
    /// Acting cat does not own the mission the target belongs to.
    Forbidden(String),
    /// Entity state forbids the operation (e.g. removing an `init` target).
    InvalidState(String),
    /// Status/notes change on a target that cannot move that way.
    InvalidTransition(String),
    /// Operation would break a structural invariant (target bounds).
    InvariantViolation(String),
    /// Breed catalog unreachable or unreadable.
    ExternalService(BreedError),
    /// Persistence failure.
    Internal(RepoError),
}

impl AgencyError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
            Self::ExternalService(_) => ErrorKind::ExternalService,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl Display for AgencyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message)
            | Self::Forbidden(message)
            | Self::InvalidState(message)
            | Self::InvalidTransition(message)
            | Self::InvariantViolation(message) => f.write_str(message),
            Self::ExternalService(err) => write!(f, "{err}"),
            Self::Internal(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AgencyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ExternalService(err) => Some(err),
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AgencyError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BreedError> for AgencyError {
    fn from(value: BreedError) -> Self {
        Self::ExternalService(value)
    }
}

impl From<RepoError> for AgencyError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Internal(other),
        }
    }
}
