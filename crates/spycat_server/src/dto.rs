//! JSON request and response bodies.
//!
//! Timestamps are stored as epoch milliseconds and exchanged as RFC 3339.

use crate::error::ApiError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use spycat_core::{
    Cat, CatId, CatPage, Mission, MissionId, NewCat, NewMission, NewTarget, Target, TargetId,
    TargetStatus, ValidationError,
};

pub fn to_rfc3339(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_rfc3339(field: &str, value: &str) -> Result<i64, ApiError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|err| ApiError::BadRequest(format!("{field} must be an RFC 3339 timestamp: {err}")))
}

#[derive(Debug, Deserialize)]
pub struct CreateCatRequest {
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
}

impl From<CreateCatRequest> for NewCat {
    fn from(value: CreateCatRequest) -> Self {
        Self {
            name: value.name,
            years_of_experience: value.years_of_experience,
            breed: value.breed,
            salary: value.salary,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSalaryRequest {
    pub salary: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CatResponse {
    pub id: CatId,
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<MissionId>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Cat> for CatResponse {
    fn from(cat: Cat) -> Self {
        Self {
            id: cat.id,
            name: cat.name,
            years_of_experience: cat.years_of_experience,
            breed: cat.breed,
            salary: cat.salary,
            mission_id: cat.mission_id,
            created_at: to_rfc3339(cat.created_at),
            updated_at: to_rfc3339(cat.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatListResponse {
    pub cats: Vec<CatResponse>,
    pub breeds: Vec<String>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl CatListResponse {
    pub fn new(page: CatPage, breeds: Vec<String>) -> Self {
        Self {
            cats: page.cats.into_iter().map(CatResponse::from).collect(),
            breeds,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreedsResponse {
    pub breeds: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTargetRequest {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateTargetRequest> for NewTarget {
    fn from(value: CreateTargetRequest) -> Self {
        Self {
            name: value.name,
            country: value.country,
            notes: value.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMissionRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub targets: Vec<CreateTargetRequest>,
}

impl CreateMissionRequest {
    pub fn into_new_mission(self) -> Result<NewMission, ApiError> {
        let start_date = self
            .start_date
            .as_deref()
            .map(|value| parse_rfc3339("start_date", value))
            .transpose()?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|value| parse_rfc3339("end_date", value))
            .transpose()?;
        Ok(NewMission {
            name: self.name,
            description: self.description,
            start_date,
            end_date,
            targets: self.targets.into_iter().map(NewTarget::from).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignCatRequest {
    pub cat_id: CatId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn status(&self) -> Result<TargetStatus, ValidationError> {
        self.status.parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: Option<String>,
    pub status: TargetStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Target> for TargetResponse {
    fn from(target: Target) -> Self {
        Self {
            id: target.id,
            mission_id: target.mission_id,
            name: target.name,
            country: target.country,
            notes: target.notes,
            status: target.status,
            created_at: to_rfc3339(target.created_at),
            updated_at: to_rfc3339(target.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MissionResponse {
    pub id: MissionId,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub cat_id: Option<CatId>,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub targets: Vec<TargetResponse>,
}

impl From<Mission> for MissionResponse {
    fn from(mission: Mission) -> Self {
        Self {
            id: mission.id,
            name: mission.name,
            description: mission.description,
            start_date: mission.start_date.map(to_rfc3339),
            end_date: mission.end_date.map(to_rfc3339),
            cat_id: mission.cat_id,
            is_completed: mission.is_completed,
            completed_at: mission.completed_at.map(to_rfc3339),
            created_at: to_rfc3339(mission.created_at),
            updated_at: to_rfc3339(mission.updated_at),
            targets: mission.targets.into_iter().map(TargetResponse::from).collect(),
        }
    }
}
