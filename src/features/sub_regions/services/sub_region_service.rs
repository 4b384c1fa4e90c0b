use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::sub_regions::dtos::{CreateSubRegionDto, UpdateSubRegionDto};
use crate::features::sub_regions::models::SubRegion;
use crate::modules::storage::to_document;
use crate::shared::crud::CrudService;
use crate::shared::filter::Where;

#[derive(Debug)]
pub struct SubRegionService {
    records: Arc<CrudService<SubRegion>>,
}

impl SubRegionService {
    pub fn new(records: Arc<CrudService<SubRegion>>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &CrudService<SubRegion> {
        &self.records
    }

    pub async fn create(&self, dto: CreateSubRegionDto) -> Result<SubRegion> {
        self.records.create(to_document(&dto)?).await
    }

    pub async fn replace_by_id(&self, id: Uuid, dto: CreateSubRegionDto) -> Result<()> {
        self.records.replace_by_id(id, to_document(&dto)?).await
    }

    pub async fn update_by_id(&self, id: Uuid, dto: UpdateSubRegionDto) -> Result<()> {
        self.records.update_by_id(id, &to_document(&dto)?).await
    }

    pub async fn update_all(&self, dto: UpdateSubRegionDto, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .update_all(&to_document(&dto)?, where_clause.as_ref())
            .await
    }
}
