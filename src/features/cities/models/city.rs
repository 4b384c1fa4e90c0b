use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind, Resource};

/// City model; `countryId` and `stateId` reference the parents' business ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub city_id: i64,
    pub name: String,
    pub country_id: i64,
    pub state_id: i64,
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub latitude: String,
    pub longitude: String,
}

impl Resource for City {
    const NAME: &'static str = "City";
    const COLLECTION: &'static str = "cities";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("cityId", "city_id", ColumnKind::Integer),
        Column::new("name", "name", ColumnKind::Text),
        Column::new("countryId", "country_id", ColumnKind::Integer),
        Column::new("stateId", "state_id", ColumnKind::Integer),
        Column::new("countryCode", "country_code", ColumnKind::Text),
        Column::new("stateCode", "state_code", ColumnKind::Text),
        Column::new("latitude", "latitude", ColumnKind::Text),
        Column::new("longitude", "longitude", ColumnKind::Text),
    ];
    const BUSINESS_ID: Option<&'static str> = Some("cityId");

    fn id(&self) -> Uuid {
        self.id
    }

    fn business_id(&self) -> Option<i64> {
        Some(self.city_id)
    }
}
