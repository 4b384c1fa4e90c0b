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
use crate::features::cities::services::CityService;
use crate::features::countries::models::Country;
use crate::features::states::models::State as StateModel;
use crate::shared::types::{projected, ApiResponse, CountResponseDto, FilterQuery, WhereQuery};

/// Create a city
#[utoipa::path(
    post,
    path = "/cities",
    request_body = CreateCityDto,
    responses(
        (status = 200, description = "City created", body = ApiResponse<City>),
        (status = 409, description = "cityId already taken"),
        (status = 422, description = "Validation error")
    ),
    tag = "cities"
)]
pub async fn create_city(
    State(service): State<Arc<CityService>>,
    AppJson(dto): AppJson<CreateCityDto>,
) -> Result<Json<ApiResponse<City>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}

#[utoipa::path(
    get,
    path = "/cities/count",
    params(WhereQuery),
    responses(
        (status = 200, description = "City count", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "cities"
)]
pub async fn count_cities(
    State(service): State<Arc<CityService>>,
    Query(query): Query<WhereQuery>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    let count = service.records().count(query.parse()?.as_ref()).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/cities",
    params(FilterQuery),
    responses(
        (status = 200, description = "List of cities", body = ApiResponse<Vec<City>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "cities"
)]
pub async fn list_cities(
    State(service): State<Arc<CityService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let cities = service.records().find(&filter).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &cities)?),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/cities",
    params(WhereQuery),
    request_body = UpdateCityDto,
    responses(
        (status = 200, description = "Number of cities updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause"),
        (status = 422, description = "Validation error")
    ),
    tag = "cities"
)]
pub async fn update_cities(
    State(service): State<Arc<CityService>>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateCityDto>,
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

#[utoipa::path(
    get,
    path = "/cities/{id}",
    params(
        ("id" = Uuid, Path, description = "City id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "City details", body = ApiResponse<City>),
        (status = 404, description = "City not found")
    ),
    tag = "cities"
)]
pub async fn get_city(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let filter = query.parse()?;
    let city = service.records().find_by_id_with(id, &filter).await?;
    Ok(Json(ApiResponse::success(
        projected(&filter, &[city])?.into_iter().next(),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/cities/{id}",
    params(("id" = Uuid, Path, description = "City id")),
    request_body = UpdateCityDto,
    responses(
        (status = 204, description = "City updated"),
        (status = 404, description = "City not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "cities"
)]
pub async fn update_city(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCityDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/cities/{id}",
    params(("id" = Uuid, Path, description = "City id")),
    request_body = CreateCityDto,
    responses(
        (status = 204, description = "City replaced"),
        (status = 404, description = "City not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "cities"
)]
pub async fn replace_city(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCityDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.replace_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/cities/{id}",
    params(("id" = Uuid, Path, description = "City id")),
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found")
    ),
    tag = "cities"
)]
pub async fn delete_city(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.records().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Parents ====================

/// Get the state a city belongs to
#[utoipa::path(
    get,
    path = "/cities/{id}/state",
    params(("id" = Uuid, Path, description = "City id")),
    responses(
        (status = 200, description = "State of the city", body = ApiResponse<StateModel>),
        (status = 404, description = "City or state not found")
    ),
    tag = "cities"
)]
pub async fn get_city_state(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StateModel>>> {
    let state = service.get_state(id).await?;
    Ok(Json(ApiResponse::success(Some(state), None, None)))
}

/// Get the country a city belongs to
#[utoipa::path(
    get,
    path = "/cities/{id}/country",
    params(("id" = Uuid, Path, description = "City id")),
    responses(
        (status = 200, description = "Country of the city", body = ApiResponse<Country>),
        (status = 404, description = "City or country not found")
    ),
    tag = "cities"
)]
pub async fn get_city_country(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Country>>> {
    let country = service.get_country(id).await?;
    Ok(Json(ApiResponse::success(Some(country), None, None)))
}

/// Countries mapped to a city
///
/// Applies the caller's filter restricted to the city's `countryId`.
#[utoipa::path(
    get,
    path = "/city/{id}/country",
    params(
        ("id" = Uuid, Path, description = "City id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Countries mapped to the city", body = ApiResponse<Vec<Country>>),
        (status = 404, description = "City not found")
    ),
    tag = "cities"
)]
pub async fn list_city_countries(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let countries = service.find_mapped_countries(id, filter.clone()).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &countries)?),
        None,
        None,
    )))
}

/// States mapped to a city
#[utoipa::path(
    get,
    path = "/city/{id}/state",
    params(
        ("id" = Uuid, Path, description = "City id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "States mapped to the city", body = ApiResponse<Vec<StateModel>>),
        (status = 404, description = "City not found")
    ),
    tag = "cities"
)]
pub async fn list_city_states(
    State(service): State<Arc<CityService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let states = service.find_mapped_states(id, filter.clone()).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &states)?),
        None,
        None,
    )))
}
