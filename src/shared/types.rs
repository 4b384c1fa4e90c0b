use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::shared::filter::{parse_where, Filter, Where};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// `filter` query parameter accepted by list, find and search endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FilterQuery {
    /// JSON filter, e.g. `{"where":{"countryId":101},"order":["name ASC"],"limit":10}`
    #[param(example = r#"{"where":{"countryId":101},"limit":10}"#)]
    pub filter: Option<String>,
}

impl FilterQuery {
    pub fn parse(&self) -> Result<Filter> {
        Ok(Filter::parse(self.filter.as_deref())?)
    }
}

/// `where` query parameter accepted by count and bulk endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct WhereQuery {
    /// JSON predicate, e.g. `{"name":{"ilike":"san%"}}`
    #[serde(rename = "where")]
    #[param(example = r#"{"name":{"ilike":"san%"}}"#)]
    pub where_clause: Option<String>,
}

impl WhereQuery {
    pub fn parse(&self) -> Result<Option<Where>> {
        Ok(parse_where(self.where_clause.as_deref())?)
    }
}

// =============================================================================
// COMMON RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountResponseDto {
    pub count: i64,
}

impl CountResponseDto {
    pub fn new(count: impl TryInto<i64>) -> Self {
        Self {
            count: count.try_into().unwrap_or(i64::MAX),
        }
    }
}

/// Serialize records and apply the filter's `fields` projection
pub fn projected<T: Serialize>(filter: &Filter, records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|record| {
            filter
                .project(record)
                .map_err(|e| AppError::Internal(format!("failed to serialize record: {}", e)))
        })
        .collect()
}
