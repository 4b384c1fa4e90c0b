use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind, Resource};

/// Country model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Uuid,
    pub country_id: i64,
    pub name: String,
    pub iso3: String,
    pub iso2: String,
    #[serde(rename = "phone_code")]
    pub phone_code: Option<String>,
    pub capital: Option<String>,
    pub currency: Option<String>,
    pub native: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    /// Localized names keyed by language code
    #[schema(value_type = Option<Object>)]
    pub translations: Option<Value>,
    pub latitude: String,
    pub longitude: String,
    pub emoji: Option<String>,
    pub emoji_u: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub timezones: Option<Value>,
}

impl Resource for Country {
    const NAME: &'static str = "Country";
    const COLLECTION: &'static str = "countries";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("countryId", "country_id", ColumnKind::Integer),
        Column::new("name", "name", ColumnKind::Text),
        Column::new("iso3", "iso3", ColumnKind::Text),
        Column::new("iso2", "iso2", ColumnKind::Text),
        Column::new("phone_code", "phone_code", ColumnKind::Text),
        Column::new("capital", "capital", ColumnKind::Text),
        Column::new("currency", "currency", ColumnKind::Text),
        Column::new("native", "native", ColumnKind::Text),
        Column::new("region", "region", ColumnKind::Text),
        Column::new("subregion", "subregion", ColumnKind::Text),
        Column::new("translations", "translations", ColumnKind::Json),
        Column::new("latitude", "latitude", ColumnKind::Text),
        Column::new("longitude", "longitude", ColumnKind::Text),
        Column::new("emoji", "emoji", ColumnKind::Text),
        Column::new("emojiU", "emoji_u", ColumnKind::Text),
        Column::new("timezones", "timezones", ColumnKind::Json),
    ];
    const BUSINESS_ID: Option<&'static str> = Some("countryId");

    fn id(&self) -> Uuid {
        self.id
    }

    fn business_id(&self) -> Option<i64> {
        Some(self.country_id)
    }
}
