use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::search::dtos::CitySearchResultDto;
use crate::features::search::services::SearchService;
use crate::shared::filter::Filter;
use crate::shared::types::{ApiResponse, FilterQuery};

/// Search cities by country
///
/// `filter` selects countries; the response lists up to 300 of their cities.
#[utoipa::path(
    get,
    path = "/countries/search",
    params(FilterQuery),
    responses(
        (status = 200, description = "Cities of the matching countries", body = ApiResponse<Vec<CitySearchResultDto>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "search"
)]
pub async fn search_by_country(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<CitySearchResultDto>>>> {
    let results = service.search_by_country(&query.parse()?).await?;
    Ok(Json(ApiResponse::success(Some(results), None, None)))
}

/// Search cities by state
///
/// `filter` selects states; the response lists up to 300 of their cities.
#[utoipa::path(
    get,
    path = "/states/search",
    params(FilterQuery),
    responses(
        (status = 200, description = "Cities of the matching states", body = ApiResponse<Vec<CitySearchResultDto>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "search"
)]
pub async fn search_by_state(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<CitySearchResultDto>>>> {
    let results = service.search_by_state(&query.parse()?).await?;
    Ok(Json(ApiResponse::success(Some(results), None, None)))
}

/// Search cities
///
/// `limit` is capped at 200. `fields` shapes the city part of each result.
#[utoipa::path(
    get,
    path = "/cities/search",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching cities with their country and state", body = ApiResponse<Vec<CitySearchResultDto>>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "search"
)]
pub async fn search_by_city(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>> {
    let filter = query.parse()?;
    let results = service.search_by_city(&filter).await?;

    let data = results
        .into_iter()
        .map(|result| project_result(&filter, result))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(ApiResponse::success(Some(data), None, None)))
}

fn project_result(filter: &Filter, result: CitySearchResultDto) -> Result<Value> {
    let serialize =
        |e: serde_json::Error| AppError::Internal(format!("failed to serialize city: {}", e));

    let mut value = filter.project(&result.city).map_err(serialize)?;
    if let Value::Object(map) = &mut value {
        if let Some(country) = result.country {
            map.insert(
                "country".to_string(),
                serde_json::to_value(country).map_err(serialize)?,
            );
        }
        if let Some(state) = result.state {
            map.insert(
                "state".to_string(),
                serde_json::to_value(state).map_err(serialize)?,
            );
        }
    }

    Ok(value)
}
