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
use crate::features::countries::dtos::{CreateCountryDto, UpdateCountryDto};
use crate::features::countries::models::Country;
use crate::features::countries::services::CountryService;
use crate::features::states::dtos::{CreateStateDto, UpdateStateDto};
use crate::features::states::models::State as StateModel;
use crate::shared::types::{projected, ApiResponse, CountResponseDto, FilterQuery, WhereQuery};

// ==================== Country Handlers ====================

/// Create a country
#[utoipa::path(
    post,
    path = "/countries",
    request_body = CreateCountryDto,
    responses(
        (status = 200, description = "Country created", body = ApiResponse<Country>),
        (status = 409, description = "countryId already taken"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn create_country(
    State(service): State<Arc<CountryService>>,
    AppJson(dto): AppJson<CreateCountryDto>,
) -> Result<Json<ApiResponse<Country>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let country = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(country), None, None)))
}

/// Count countries matching `where`
#[utoipa::path(
    get,
    path = "/countries/count",
    params(WhereQuery),
    responses(
        (status = 200, description = "Country count", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "countries"
)]
pub async fn count_countries(
    State(service): State<Arc<CountryService>>,
    Query(query): Query<WhereQuery>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    let where_clause = query.parse()?;
    let count = service.records().count(where_clause.as_ref()).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

/// List countries
#[utoipa::path(
    get,
    path = "/countries",
    params(FilterQuery),
    responses(
        (status = 200, description = "List of countries", body = ApiResponse<Vec<Country>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "countries"
)]
pub async fn list_countries(
    State(service): State<Arc<CountryService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let countries = service.records().find(&filter).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &countries)?),
        None,
        None,
    )))
}

/// Patch every country matching `where`
#[utoipa::path(
    patch,
    path = "/countries",
    params(WhereQuery),
    request_body = UpdateCountryDto,
    responses(
        (status = 200, description = "Number of countries updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn update_countries(
    State(service): State<Arc<CountryService>>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateCountryDto>,
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

/// Get a country by id
#[utoipa::path(
    get,
    path = "/countries/{id}",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Country details", body = ApiResponse<Country>),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn get_country(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let filter = query.parse()?;
    let country = service.records().find_by_id_with(id, &filter).await?;
    let projected = projected(&filter, &[country])?.into_iter().next();
    Ok(Json(ApiResponse::success(projected, None, None)))
}

/// Partially update a country
#[utoipa::path(
    patch,
    path = "/countries/{id}",
    params(("id" = Uuid, Path, description = "Country id")),
    request_body = UpdateCountryDto,
    responses(
        (status = 204, description = "Country updated"),
        (status = 404, description = "Country not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn update_country(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCountryDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a country
#[utoipa::path(
    put,
    path = "/countries/{id}",
    params(("id" = Uuid, Path, description = "Country id")),
    request_body = CreateCountryDto,
    responses(
        (status = 204, description = "Country replaced"),
        (status = 404, description = "Country not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn replace_country(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCountryDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.replace_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a country
///
/// States and cities referencing the country are left in place.
#[utoipa::path(
    delete,
    path = "/countries/{id}",
    params(("id" = Uuid, Path, description = "Country id")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn delete_country(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.records().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Country → States ====================

/// List the states of a country
#[utoipa::path(
    get,
    path = "/countries/{id}/states",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "States of the country", body = ApiResponse<Vec<StateModel>>),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn list_country_states(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let states = service.find_states(id, filter.clone()).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &states)?),
        None,
        None,
    )))
}

/// Create a state in a country
#[utoipa::path(
    post,
    path = "/countries/{id}/states",
    params(("id" = Uuid, Path, description = "Country id")),
    request_body = CreateStateDto,
    responses(
        (status = 200, description = "State created", body = ApiResponse<StateModel>),
        (status = 404, description = "Country not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn create_country_state(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateStateDto>,
) -> Result<Json<ApiResponse<StateModel>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let state = service.create_state(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(state), None, None)))
}

/// Patch the states of a country matching `where`
#[utoipa::path(
    patch,
    path = "/countries/{id}/states",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        WhereQuery
    ),
    request_body = UpdateStateDto,
    responses(
        (status = 200, description = "Number of states updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "countryId cannot be changed here"),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn update_country_states(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateStateDto>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let count = service.update_states(id, dto, query.parse()?).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

/// Delete the states of a country matching `where`
#[utoipa::path(
    delete,
    path = "/countries/{id}/states",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        WhereQuery
    ),
    responses(
        (status = 200, description = "Number of states deleted", body = ApiResponse<CountResponseDto>),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn delete_country_states(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<WhereQuery>,
) -> Result<Json<ApiResponse<CountResponseDto>>> {
    let count = service.delete_states(id, query.parse()?).await?;
    Ok(Json(ApiResponse::success(
        Some(CountResponseDto::new(count)),
        None,
        None,
    )))
}

// ==================== Country → Cities ====================

/// List the cities of a country
#[utoipa::path(
    get,
    path = "/countries/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Cities of the country", body = ApiResponse<Vec<City>>),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn list_country_cities(
    State(service): State<Arc<CountryService>>,
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

/// Create a city in a country
#[utoipa::path(
    post,
    path = "/countries/{id}/cities",
    params(("id" = Uuid, Path, description = "Country id")),
    request_body = CreateCityDto,
    responses(
        (status = 200, description = "City created", body = ApiResponse<City>),
        (status = 404, description = "Country not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "countries"
)]
pub async fn create_country_city(
    State(service): State<Arc<CountryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCityDto>,
) -> Result<Json<ApiResponse<City>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = service.create_city(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}

/// Patch the cities of a country matching `where`
#[utoipa::path(
    patch,
    path = "/countries/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        WhereQuery
    ),
    request_body = UpdateCityDto,
    responses(
        (status = 200, description = "Number of cities updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "countryId cannot be changed here"),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn update_country_cities(
    State(service): State<Arc<CountryService>>,
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

/// Delete the cities of a country matching `where`
#[utoipa::path(
    delete,
    path = "/countries/{id}/cities",
    params(
        ("id" = Uuid, Path, description = "Country id"),
        WhereQuery
    ),
    responses(
        (status = 200, description = "Number of cities deleted", body = ApiResponse<CountResponseDto>),
        (status = 404, description = "Country not found")
    ),
    tag = "countries"
)]
pub async fn delete_country_cities(
    State(service): State<Arc<CountryService>>,
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
