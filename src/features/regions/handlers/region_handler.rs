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
use crate::features::regions::dtos::{CreateRegionDto, UpdateRegionDto};
use crate::features::regions::models::Region;
use crate::features::regions::services::RegionService;
use crate::shared::types::{projected, ApiResponse, CountResponseDto, FilterQuery, WhereQuery};

#[utoipa::path(
    post,
    path = "/regions",
    request_body = CreateRegionDto,
    responses(
        (status = 200, description = "Region created", body = ApiResponse<Region>),
        (status = 422, description = "Validation error")
    ),
    tag = "regions"
)]
pub async fn create_region(
    State(service): State<Arc<RegionService>>,
    AppJson(dto): AppJson<CreateRegionDto>,
) -> Result<Json<ApiResponse<Region>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let region = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(region), None, None)))
}

#[utoipa::path(
    get,
    path = "/regions/count",
    params(WhereQuery),
    responses(
        (status = 200, description = "Region count", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "regions"
)]
pub async fn count_regions(
    State(service): State<Arc<RegionService>>,
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
    path = "/regions",
    params(FilterQuery),
    responses(
        (status = 200, description = "List of regions", body = ApiResponse<Vec<Region>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "regions"
)]
pub async fn list_regions(
    State(service): State<Arc<RegionService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let regions = service.records().find(&filter).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &regions)?),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/regions",
    params(WhereQuery),
    request_body = UpdateRegionDto,
    responses(
        (status = 200, description = "Number of regions updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "regions"
)]
pub async fn update_regions(
    State(service): State<Arc<RegionService>>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateRegionDto>,
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
    path = "/regions/{id}",
    params(
        ("id" = Uuid, Path, description = "Region id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Region details", body = ApiResponse<Region>),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn get_region(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let filter = query.parse()?;
    let region = service.records().find_by_id_with(id, &filter).await?;
    Ok(Json(ApiResponse::success(
        projected(&filter, &[region])?.into_iter().next(),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/regions/{id}",
    params(("id" = Uuid, Path, description = "Region id")),
    request_body = UpdateRegionDto,
    responses(
        (status = 204, description = "Region updated"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn update_region(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateRegionDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/regions/{id}",
    params(("id" = Uuid, Path, description = "Region id")),
    request_body = CreateRegionDto,
    responses(
        (status = 204, description = "Region replaced"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn replace_region(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateRegionDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.replace_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/regions/{id}",
    params(("id" = Uuid, Path, description = "Region id")),
    responses(
        (status = 204, description = "Region deleted"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn delete_region(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.records().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
