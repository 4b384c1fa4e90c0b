use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind, Resource};

/// Sub-region of a world region (e.g. "South America")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubRegion {
    pub id: Uuid,
    pub name: String,
}

impl Resource for SubRegion {
    const NAME: &'static str = "SubRegion";
    const COLLECTION: &'static str = "sub_regions";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("name", "name", ColumnKind::Text),
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
