use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for creating or replacing a state
///
/// `stateId` is assigned automatically when omitted. `countryId` is required
/// except when the state is created through `/countries/{id}/states`, which
/// sets it from the owning country.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "stateId must be positive"))]
    pub state_id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub state_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,

    pub country_code: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::COORDINATE_REGEX",
        message = "latitude must be a decimal number"
    ))]
    pub latitude: String,

    #[validate(regex(
        path = "*crate::shared::validation::COORDINATE_REGEX",
        message = "longitude must be a decimal number"
    ))]
    pub longitude: String,
}

/// Request DTO for partially updating states
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "stateId must be positive"))]
    pub state_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = "*crate::shared::validation::COORDINATE_REGEX",
        message = "latitude must be a decimal number"
    ))]
    pub latitude: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = "*crate::shared::validation::COORDINATE_REGEX",
        message = "longitude must be a decimal number"
    ))]
    pub longitude: Option<String>,
}
