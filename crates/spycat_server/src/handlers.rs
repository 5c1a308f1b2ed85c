//! Route handlers: decode, run the agency use-case off the async runtime,
//! encode.

use crate::dto::{
    AssignCatRequest, BreedsResponse, CatListResponse, CatResponse, CreateCatRequest,
    CreateMissionRequest, CreateTargetRequest, MissionResponse, PageQuery, TargetResponse,
    UpdateNotesRequest, UpdateSalaryRequest, UpdateStatusRequest,
};
use crate::error::ApiError;
use crate::extract::{positive, Body, Ids, Params};
use crate::state::SharedState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use spycat_core::{core_version, BreedSnapshot, CatService, MissionService, NewCat, NewTarget};

type ApiResult<T> = Result<T, ApiError>;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "spycat_server",
        "version": core_version(),
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn list_cats(
    State(state): State<SharedState>,
    Params(query): Params<PageQuery>,
) -> ApiResult<Json<CatListResponse>> {
    let response = state
        .run_with_breeds("cat_list", move |conn, breeds| {
            let service = CatService::new(conn, breeds);
            let page = service.list_cats(query.limit, query.offset)?;
            let breeds = service.list_breeds()?;
            Ok(CatListResponse::new(page, breeds))
        })
        .await?;
    Ok(Json(response))
}

pub async fn list_breeds(State(state): State<SharedState>) -> ApiResult<Json<BreedsResponse>> {
    let breeds = state.breeds("breed_list").await?;
    Ok(Json(BreedsResponse {
        breeds: breeds.names().to_vec(),
    }))
}

pub async fn get_cat(
    State(state): State<SharedState>,
    Ids(cat_id): Ids<i64>,
) -> ApiResult<Json<CatResponse>> {
    let cat_id = positive("cat id", cat_id)?;
    let cat = state
        .run("cat_get", move |conn| {
            CatService::new(conn, &BreedSnapshot::default()).get_cat(cat_id)
        })
        .await?;
    Ok(Json(cat.into()))
}

pub async fn create_cat(
    State(state): State<SharedState>,
    Body(request): Body<CreateCatRequest>,
) -> ApiResult<(StatusCode, Json<CatResponse>)> {
    // Field errors win over an unreachable breed catalog.
    let request = NewCat::from(request).normalized()?;
    let cat = state
        .run_with_breeds("cat_create", move |conn, breeds| {
            CatService::new(conn, breeds).create_cat(&request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(cat.into())))
}

pub async fn update_salary(
    State(state): State<SharedState>,
    Ids(cat_id): Ids<i64>,
    Body(request): Body<UpdateSalaryRequest>,
) -> ApiResult<Json<CatResponse>> {
    let cat_id = positive("cat id", cat_id)?;
    let cat = state
        .run("cat_salary", move |conn| {
            CatService::new(conn, &BreedSnapshot::default())
                .update_salary(cat_id, request.salary)
        })
        .await?;
    Ok(Json(cat.into()))
}

pub async fn delete_cat(
    State(state): State<SharedState>,
    Ids(cat_id): Ids<i64>,
) -> ApiResult<StatusCode> {
    let cat_id = positive("cat id", cat_id)?;
    state
        .run("cat_delete", move |conn| {
            CatService::new(conn, &BreedSnapshot::default()).delete_cat(cat_id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_mission(
    State(state): State<SharedState>,
    Body(request): Body<CreateMissionRequest>,
) -> ApiResult<(StatusCode, Json<MissionResponse>)> {
    let request = request.into_new_mission()?;
    let mission = state
        .run("mission_create", move |conn| {
            MissionService::new(conn).create_mission(&request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(mission.into())))
}

pub async fn list_missions(State(state): State<SharedState>) -> ApiResult<Json<Vec<MissionResponse>>> {
    let missions = state
        .run("mission_list", |conn| MissionService::new(conn).list_missions())
        .await?;
    Ok(Json(missions.into_iter().map(MissionResponse::from).collect()))
}

pub async fn free_cats(State(state): State<SharedState>) -> ApiResult<Json<Vec<CatResponse>>> {
    let cats = state
        .run("free_cats", |conn| MissionService::new(conn).free_cats())
        .await?;
    Ok(Json(cats.into_iter().map(CatResponse::from).collect()))
}

pub async fn get_mission(
    State(state): State<SharedState>,
    Ids(mission_id): Ids<i64>,
) -> ApiResult<Json<MissionResponse>> {
    let mission_id = positive("mission id", mission_id)?;
    let mission = state
        .run("mission_get", move |conn| {
            MissionService::new(conn).get_mission(mission_id)
        })
        .await?;
    Ok(Json(mission.into()))
}

pub async fn delete_mission(
    State(state): State<SharedState>,
    Ids(mission_id): Ids<i64>,
) -> ApiResult<StatusCode> {
    let mission_id = positive("mission id", mission_id)?;
    state
        .run("mission_delete", move |conn| {
            MissionService::new(conn).delete_mission(mission_id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_cat(
    State(state): State<SharedState>,
    Ids(mission_id): Ids<i64>,
    Body(request): Body<AssignCatRequest>,
) -> ApiResult<Json<MissionResponse>> {
    let mission_id = positive("mission id", mission_id)?;
    let cat_id = positive("cat_id", request.cat_id)?;
    let mission = state
        .run("cat_assign", move |conn| {
            MissionService::new(conn).assign_cat(mission_id, cat_id)
        })
        .await?;
    Ok(Json(mission.into()))
}

pub async fn unassign_cat(
    State(state): State<SharedState>,
    Ids(mission_id): Ids<i64>,
) -> ApiResult<Json<MissionResponse>> {
    let mission_id = positive("mission id", mission_id)?;
    let mission = state
        .run("cat_unassign", move |conn| {
            MissionService::new(conn).unassign_cat(mission_id)
        })
        .await?;
    Ok(Json(mission.into()))
}

pub async fn add_target(
    State(state): State<SharedState>,
    Ids(mission_id): Ids<i64>,
    Body(request): Body<CreateTargetRequest>,
) -> ApiResult<(StatusCode, Json<TargetResponse>)> {
    let mission_id = positive("mission id", mission_id)?;
    let request = NewTarget::from(request);
    let target = state
        .run("target_add", move |conn| {
            MissionService::new(conn).add_target(mission_id, &request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(target.into())))
}

pub async fn delete_target(
    State(state): State<SharedState>,
    Ids((mission_id, target_id)): Ids<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let mission_id = positive("mission id", mission_id)?;
    let target_id = positive("target id", target_id)?;
    state
        .run("target_delete", move |conn| {
            MissionService::new(conn).delete_target(mission_id, target_id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `200` with the mission, or `204` when the cat has none.
pub async fn cat_mission(
    State(state): State<SharedState>,
    Ids(cat_id): Ids<i64>,
) -> ApiResult<Response> {
    let cat_id = positive("cat id", cat_id)?;
    let mission = state
        .run("cat_mission", move |conn| {
            // Unknown cats are 404, not "no mission".
            CatService::new(&mut *conn, &BreedSnapshot::default()).get_cat(cat_id)?;
            MissionService::new(conn).mission_for_cat(cat_id)
        })
        .await?;
    Ok(match mission {
        Some(mission) => Json(MissionResponse::from(mission)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn update_target_status(
    State(state): State<SharedState>,
    Ids((cat_id, target_id)): Ids<(i64, i64)>,
    Body(request): Body<UpdateStatusRequest>,
) -> ApiResult<Json<TargetResponse>> {
    let cat_id = positive("cat id", cat_id)?;
    let target_id = positive("target id", target_id)?;
    let status = request.status()?;
    let target = state
        .run("target_status", move |conn| {
            MissionService::new(conn).update_target_status(cat_id, target_id, status)
        })
        .await?;
    Ok(Json(target.into()))
}

pub async fn update_target_notes(
    State(state): State<SharedState>,
    Ids((cat_id, target_id)): Ids<(i64, i64)>,
    Body(request): Body<UpdateNotesRequest>,
) -> ApiResult<Json<TargetResponse>> {
    let cat_id = positive("cat id", cat_id)?;
    let target_id = positive("target id", target_id)?;
    let target = state
        .run("target_notes", move |conn| {
            MissionService::new(conn).update_target_notes(cat_id, target_id, request.notes.as_deref())
        })
        .await?;
    Ok(Json(target.into()))
}
