use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::pickup::PickupStatus;
use serde::Deserialize;
use service::pickup::domain::{
    CreatePickupInput, NewPickup, PickupChanges, PickupFilter, UpdatePickupInput,
};
use service::pickup::impact::ImpactReport;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

type ApiResult<T> = Result<T, JsonApiError>;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only pickups in this status (case-insensitive)
    pub status: Option<String>,
    /// Only pickups owned by this user
    pub user_name: Option<String>,
}

impl TryFrom<ListQuery> for PickupFilter {
    type Error = JsonApiError;

    fn try_from(q: ListQuery) -> Result<Self, Self::Error> {
        let status = q
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<PickupStatus>())
            .transpose()
            .map_err(|e| JsonApiError::bad_request("Invalid Query", e.to_string()))?;
        let user_name = q.user_name.filter(|u| !u.is_empty());
        Ok(PickupFilter { status, user_name })
    }
}

fn path_id(id: Result<Path<i32>, PathRejection>) -> ApiResult<i32> {
    Ok(id?.0)
}

#[utoipa::path(
    get, path = "/pickups", tag = "pickups",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::PickupDoc]),
        (status = 400, description = "Invalid Filter", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Database Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<models::pickup::Model>>> {
    let Query(q) = query?;
    let filter = PickupFilter::try_from(q)?;
    let rows = state.pickups.list(&filter).await?;
    info!(count = rows.len(), "list pickups");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/pickups/{id}", tag = "pickups",
    params(("id" = i32, Path, description = "Pickup ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PickupDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<models::pickup::Model>> {
    let id = path_id(id)?;
    Ok(Json(state.pickups.get(id).await?))
}

#[utoipa::path(
    post, path = "/pickups", tag = "pickups",
    request_body = crate::openapi::CreatePickupDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PickupDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Database Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<CreatePickupInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<models::pickup::Model>)> {
    let Json(input) = body?;
    let new = NewPickup::try_from(input)?;
    let created = state.pickups.create(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/pickups/{id}", tag = "pickups",
    params(("id" = i32, Path, description = "Pickup ID")),
    request_body = crate::openapi::UpdatePickupDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PickupDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Database Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdatePickupInput>, JsonRejection>,
) -> ApiResult<Json<models::pickup::Model>> {
    let id = path_id(id)?;
    let Json(input) = body?;
    let changes = PickupChanges::try_from(input)?;
    Ok(Json(state.pickups.update(id, changes).await?))
}

#[utoipa::path(
    delete, path = "/pickups/{id}", tag = "pickups",
    params(("id" = i32, Path, description = "Pickup ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Database Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id)?;
    state.pickups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/environmental-impact", tag = "impact",
    responses(
        (status = 200, description = "Impact over completed pickups", body = crate::openapi::ImpactReportDoc),
        (status = 500, description = "Database Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn environmental_impact(State(state): State<ServerState>) -> ApiResult<Json<ImpactReport>> {
    Ok(Json(state.pickups.environmental_impact().await?))
}
