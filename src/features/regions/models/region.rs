use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind, Resource};

/// World region (e.g. "Americas")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
}

impl Resource for Region {
    const NAME: &'static str = "Region";
    const COLLECTION: &'static str = "regions";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("name", "name", ColumnKind::Text),
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
