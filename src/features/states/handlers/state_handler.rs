use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::cities::dtos::{CreateCityDto, UpdateCityDto};
use crate::features::cities::models::City;
use crate::features::countries::models::Country;
use crate::features::states::dtos::{CreateStateDto, UpdateStateDto};
use crate::features::states::models;
use crate::features::states::services::StateService;
use crate::shared::types::{projected, ApiResponse, CountResponseDto, FilterQuery, WhereQuery};

// ==================== State Handlers ====================

/// Create a state
#[utoipa::path(
    post,
    path = "/states",
    request_body = CreateStateDto,
    responses(
        (status = 200, description = "State created", body = ApiResponse<models::State>),
        (status = 409, description = "stateId already taken"),
        (status = 422, description = "Validation error")
    ),
    tag = "states"
)]
pub async fn create_state(
    State(service): State<Arc<StateService>>,
    AppJson(dto): AppJson<CreateStateDto>,
) -> Result<Json<ApiResponse<models::State>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let state = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(state), None, None)))
}

/// Count states matching `where`
#[utoipa::path(
    get,
    path = "/states/count",
    params(WhereQuery),
    responses(
        (status = 200, description = "State count", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "states"
)]
pub async fn count_states(
    State(service): State<Arc<StateService>>,
    Query(query): Query<WhereQuery>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    let count = service.records().count(query.parse()?.as_ref()).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

/// List states
#[utoipa::path(
    get,
    path = "/states",
    params(FilterQuery),
    responses(
        (status = 200, description = "List of states", body = ApiResponse<Vec<models::State>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "states"
)]
pub async fn list_states(
    State(service): State<Arc<StateService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let states = service.records().find(&filter).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &states)?),
        None,
        None,
    )))
}

/// Patch every state matching `where`
#[utoipa::path(
    patch,
    path = "/states",
    params(WhereQuery),
    request_body = UpdateStateDto,
    responses(
        (status = 200, description = "Number of states updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause"),
        (status = 422, description = "Validation error")
    ),
    tag = "states"
)]
pub async fn update_states(
    State(service): State<Arc<StateService>>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateStateDto>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let count = service.update_all(dto, query.parse()?).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

/// Get a state by id
#[utoipa::path(
    get,
    path = "/states/{id}",
    params(
        ("id" = Uuid, Path, description = "State id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "State details", body = ApiResponse<models::State>),
        (status = 404, description = "State not found")
    ),
    tag = "states"
)]
pub async fn get_state(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let filter = query.parse()?;
    let state = service.records().find_by_id_with(id, &filter).await?;
    Ok(Json(ApiResponse::success(
        projected(&filter, &[state])?.into_iter().next(),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/states/{id}",
    params(("id" = Uuid, Path, description = "State id")),
    request_body = UpdateStateDto,
    responses(
        (status = 204, description = "State updated"),
        (status = 404, description = "State not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "states"
)]
pub async fn update_state(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStateDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/states/{id}",
    params(("id" = Uuid, Path, description = "State id")),
    request_body = CreateStateDto,
    responses(
        (status = 204, description = "State replaced"),
        (status = 404, description = "State not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "states"
)]
pub async fn replace_state(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateStateDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.replace_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/states/{id}",
    params(("id" = Uuid, Path, description = "State id")),
    responses(
        (status = 204, description = "State deleted"),
        (status = 404, description = "State not found")
    ),
    tag = "states"
)]
pub async fn delete_state(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.records().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the country a state belongs to
#[utoipa::path(
    get,
    path = "/states/{id}/country",
    params(("id" = Uuid, Path, description = "State id")),
    responses(
        (status = 200, description = "Country of the state", body = ApiResponse<Country>),
        (status = 404, description = "State or country not found")
    ),
    tag = "states"
)]
pub async fn get_state_country(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Country>>> {
    let country = service.get_country(id).await?;
    Ok(Json(ApiResponse::success(Some(country), None, None)))
}

// ==================== State → Cities ====================

#[utoipa::path(
    get,
    path = "/states/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "State id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Cities of the state", body = ApiResponse<Vec<City>>),
        (status = 404, description = "State not found")
    ),
    tag = "states"
)]
pub async fn list_state_cities(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let cities = service.find_cities(id, filter.clone()).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &cities)?),
        None,
        None,
    )))
}

/// Create a city in a state
///
/// The city's `stateId` and `countryId` are taken from the state.
#[utoipa::path(
    post,
    path = "/states/{id}/cities",
    params(("id" = Uuid, Path, description = "State id")),
    request_body = CreateCityDto,
    responses(
        (status = 200, description = "City created", body = ApiResponse<City>),
        (status = 404, description = "State not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "states"
)]
pub async fn create_state_city(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCityDto>,
) -> Result<Json<ApiResponse<City>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = service.create_city(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}

#[utoipa::path(
    patch,
    path = "/states/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "State id"),
        WhereQuery
    ),
    request_body = UpdateCityDto,
    responses(
        (status = 200, description = "Number of cities updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "stateId cannot be changed here"),
        (status = 404, description = "State not found")
    ),
    tag = "states"
)]
pub async fn update_state_cities(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateCityDto>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let count = service.update_cities(id, dto, query.parse()?).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/states/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "State id"),
        WhereQuery
    ),
    responses(
        (status = 200, description = "Number of cities deleted", body = ApiResponse<CountResponseDto>),
        (status = 404, description = "State not found")
    ),
    tag = "states"
)]
pub async fn delete_state_cities(
    State(service): State<Arc<StateService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<WhereQuery>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    let count = service.delete_cities(id, query.parse()?).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}
