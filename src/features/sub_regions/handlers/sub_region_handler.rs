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
use crate::features::sub_regions::dtos::{CreateSubRegionDto, UpdateSubRegionDto};
use crate::features::sub_regions::models::SubRegion;
use crate::features::sub_regions::services::SubRegionService;
use crate::shared::types::{projected, ApiResponse, CountResponseDto, FilterQuery, WhereQuery};

#[utoipa::path(
    post,
    path = "/sub-regions",
    request_body = CreateSubRegionDto,
    responses(
        (status = 200, description = "Sub-region created", body = ApiResponse<SubRegion>),
        (status = 422, description = "Validation error")
    ),
    tag = "sub-regions"
)]
pub async fn create_sub_region(
    State(service): State<Arc<SubRegionService>>,
    AppJson(dto): AppJson<CreateSubRegionDto>,
) -> Result<Json<ApiResponse<SubRegion>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let sub_region = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(sub_region), None, None)))
}

#[utoipa::path(
    get,
    path = "/sub-regions/count",
    params(WhereQuery),
    responses(
        (status = 200, description = "Sub-region count", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "sub-regions"
)]
pub async fn count_sub_regions(
    State(service): State<Arc<SubRegionService>>,
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
    path = "/sub-regions",
    params(FilterQuery),
    responses(
        (status = 200, description = "List of sub-regions", body = ApiResponse<Vec<SubRegion>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "sub-regions"
)]
pub async fn list_sub_regions(
    State(service): State<Arc<SubRegionService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let sub_regions = service.records().find(&filter).await?;
    Ok(Json(ApiResponse::success(
        Some(projected(&filter, &sub_regions)?),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/sub-regions",
    params(WhereQuery),
    request_body = UpdateSubRegionDto,
    responses(
        (status = 200, description = "Number of sub-regions updated", body = ApiResponse<CountResponseDto>),
        (status = 400, description = "Malformed where clause")
    ),
    tag = "sub-regions"
)]
pub async fn update_sub_regions(
    State(service): State<Arc<SubRegionService>>,
    Query(query): Query<WhereQuery>,
    AppJson(dto): AppJson<UpdateSubRegionDto>,
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
    path = "/sub-regions/{id}",
    params(
        ("id" = Uuid, Path, description = "Sub-region id"),
        FilterQuery
    ),
    responses(
        (status = 200, description = "Sub-region details", body = ApiResponse<SubRegion>),
        (status = 404, description = "Sub-region not found")
    ),
    tag = "sub-regions"
)]
pub async fn get_sub_region(
    State(service): State<Arc<SubRegionService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let filter = query.parse()?;
    let sub_region = service.records().find_by_id_with(id, &filter).await?;
    Ok(Json(ApiResponse::success(
        projected(&filter, &[sub_region])?.into_iter().next(),
        None,
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/sub-regions/{id}",
    params(("id" = Uuid, Path, description = "Sub-region id")),
    request_body = UpdateSubRegionDto,
    responses(
        (status = 204, description = "Sub-region updated"),
        (status = 404, description = "Sub-region not found")
    ),
    tag = "sub-regions"
)]
pub async fn update_sub_region(
    State(service): State<Arc<SubRegionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSubRegionDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/sub-regions/{id}",
    params(("id" = Uuid, Path, description = "Sub-region id")),
    request_body = CreateSubRegionDto,
    responses(
        (status = 204, description = "Sub-region replaced"),
        (status = 404, description = "Sub-region not found")
    ),
    tag = "sub-regions"
)]
pub async fn replace_sub_region(
    State(service): State<Arc<SubRegionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateSubRegionDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.replace_by_id(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/sub-regions/{id}",
    params(("id" = Uuid, Path, description = "Sub-region id")),
    responses(
        (status = 204, description = "Sub-region deleted"),
        (status = 404, description = "Sub-region not found")
    ),
    tag = "sub-regions"
)]
pub async fn delete_sub_region(
    State(service): State<Arc<SubRegionService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.records().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
