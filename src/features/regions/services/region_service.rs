use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::regions::dtos::{CreateRegionDto, UpdateRegionDto};
use crate::features::regions::models::Region;
use crate::modules::storage::to_document;
use crate::shared::crud::CrudService;
use crate::shared::filter::Where;

#[derive(Debug)]
pub struct RegionService {
    records: Arc<CrudService<Region>>,
}

impl RegionService {
    pub fn new(records: Arc<CrudService<Region>>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &CrudService<Region> {
        &self.records
    }

    pub async fn create(&self, dto: CreateRegionDto) -> Result<Region> {
        self.records.create(to_document(&dto)?).await
    }

    pub async fn replace_by_id(&self, id: Uuid, dto: CreateRegionDto) -> Result<()> {
        self.records.replace_by_id(id, to_document(&dto)?).await
    }

    pub async fn update_by_id(&self, id: Uuid, dto: UpdateRegionDto) -> Result<()> {
        self.records.update_by_id(id, &to_document(&dto)?).await
    }

    pub async fn update_all(&self, dto: UpdateRegionDto, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .update_all(&to_document(&dto)?, where_clause.as_ref())
            .await
    }
}
