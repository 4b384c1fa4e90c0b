use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind, Resource};

/// State (first-level subdivision) model; `countryId` references `Country.countryId`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: Uuid,
    pub state_id: i64,
    pub name: String,
    pub state_code: Option<String>,
    pub country_id: i64,
    pub country_code: Option<String>,
    pub latitude: String,
    pub longitude: String,
}

impl Resource for State {
    const NAME: &'static str = "State";
    const COLLECTION: &'static str = "states";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("stateId", "state_id", ColumnKind::Integer),
        Column::new("name", "name", ColumnKind::Text),
        Column::new("stateCode", "state_code", ColumnKind::Text),
        Column::new("countryId", "country_id", ColumnKind::Integer),
        Column::new("countryCode", "country_code", ColumnKind::Text),
        Column::new("latitude", "latitude", ColumnKind::Text),
        Column::new("longitude", "longitude", ColumnKind::Text),
    ];
    const BUSINESS_ID: Option<&'static str> = Some("stateId");

    fn id(&self) -> Uuid {
        self.id
    }

    fn business_id(&self) -> Option<i64> {
        Some(self.state_id)
    }
}
