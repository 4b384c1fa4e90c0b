use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for creating or replacing a country
///
/// `countryId` is assigned automatically when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCountryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "countryId must be positive"))]
    pub country_id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(regex(
        path = "*crate::shared::validation::ISO3_REGEX",
        message = "iso3 must be three uppercase letters"
    ))]
    pub iso3: String,

    #[validate(regex(
        path = "*crate::shared::validation::ISO2_REGEX",
        message = "iso2 must be two uppercase letters"
    ))]
    pub iso2: String,

    #[serde(rename = "phone_code")]
    pub phone_code: Option<String>,
    pub capital: Option<String>,
    pub currency: Option<String>,
    pub native: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub translations: Option<Value>,

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

    pub emoji: Option<String>,
    pub emoji_u: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub timezones: Option<Value>,
}

/// Request DTO for partially updating countries; omitted fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCountryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "countryId must be positive"))]
    pub country_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = "*crate::shared::validation::ISO3_REGEX",
        message = "iso3 must be three uppercase letters"
    ))]
    pub iso3: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = "*crate::shared::validation::ISO2_REGEX",
        message = "iso2 must be two uppercase letters"
    ))]
    pub iso2: Option<String>,

    #[serde(rename = "phone_code", skip_serializing_if = "Option::is_none")]
    pub phone_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub translations: Option<Value>,

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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_u: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub timezones: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_dto_validation() {
        let dto: CreateCountryDto = serde_json::from_value(json!({
            "name": "Peru",
            "iso3": "PER",
            "iso2": "PE",
            "phone_code": "51",
            "latitude": "-10.00000000",
            "longitude": "-76.00000000"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let bad = CreateCountryDto {
            iso2: "pe".to_string(),
            latitude: "south".to_string(),
            ..dto
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("iso2"));
        assert!(fields.contains_key("latitude"));
    }

    #[test]
    fn test_update_dto_serializes_only_present_fields() {
        let dto = UpdateCountryDto {
            phone_code: Some("51".to_string()),
            emoji_u: Some("U+1F1F5 U+1F1EA".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"phone_code": "51", "emojiU": "U+1F1F5 U+1F1EA"})
        );
    }
}
