use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::cities::dtos::{CreateCityDto, UpdateCityDto};
use crate::features::cities::models::City;
use crate::features::countries::models::Country;
use crate::features::states::dtos::{CreateStateDto, UpdateStateDto};
use crate::features::states::models::State;
use crate::modules::storage::to_document;
use crate::shared::crud::CrudService;
use crate::shared::filter::{Filter, Where};
use crate::shared::relations::{BelongsTo, HasMany};

pub struct StateService {
    records: Arc<CrudService<State>>,
    cities: HasMany<City>,
    country: BelongsTo<Country>,
}

impl std::fmt::Debug for StateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateService").finish_non_exhaustive()
    }
}

impl StateService {
    pub fn new(
        records: Arc<CrudService<State>>,
        countries: Arc<CrudService<Country>>,
        cities: Arc<CrudService<City>>,
    ) -> Self {
        Self {
            records,
            cities: HasMany::new(cities, "stateId"),
            country: BelongsTo::new(countries, "countryId"),
        }
    }

    pub fn records(&self) -> &CrudService<State> {
        &self.records
    }

    pub async fn create(&self, dto: CreateStateDto) -> Result<State> {
        self.records.create(to_document(&dto)?).await
    }

    pub async fn replace_by_id(&self, id: Uuid, dto: CreateStateDto) -> Result<()> {
        self.records.replace_by_id(id, to_document(&dto)?).await
    }

    pub async fn update_by_id(&self, id: Uuid, dto: UpdateStateDto) -> Result<()> {
        self.records.update_by_id(id, &to_document(&dto)?).await
    }

    pub async fn update_all(&self, dto: UpdateStateDto, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .update_all(&to_document(&dto)?, where_clause.as_ref())
            .await
    }

    /// The country this state belongs to
    pub async fn get_country(&self, id: Uuid) -> Result<Country> {
        let state = self.records.find_by_id(id).await?;
        self.country.get(state.country_id).await
    }

    // ==================== Cities ====================

    pub async fn find_cities(&self, id: Uuid, filter: Filter) -> Result<Vec<City>> {
        let state = self.records.find_by_id(id).await?;
        self.cities.find(state.state_id, filter).await
    }

    /// Create a city in this state; it also inherits the state's country
    pub async fn create_city(&self, id: Uuid, dto: CreateCityDto) -> Result<City> {
        let state = self.records.find_by_id(id).await?;

        let mut draft = to_document(&dto)?;
        draft.insert("countryId".to_string(), Value::from(state.country_id));

        self.cities.create(state.state_id, draft).await
    }

    pub async fn update_cities(
        &self,
        id: Uuid,
        dto: UpdateCityDto,
        where_clause: Option<Where>,
    ) -> Result<u64> {
        let state = self.records.find_by_id(id).await?;
        self.cities
            .patch(state.state_id, &to_document(&dto)?, where_clause)
            .await
    }

    pub async fn delete_cities(&self, id: Uuid, where_clause: Option<Where>) -> Result<u64> {
        let state = self.records.find_by_id(id).await?;
        self.cities.delete(state.state_id, where_clause).await
    }
}
