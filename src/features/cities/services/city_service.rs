use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::cities::dtos::{CreateCityDto, UpdateCityDto};
use crate::features::cities::models::City;
use crate::features::countries::models::Country;
use crate::features::states::models::State;
use crate::modules::storage::to_document;
use crate::shared::crud::CrudService;
use crate::shared::filter::{Filter, Where};
use crate::shared::relations::BelongsTo;

pub struct CityService {
    records: Arc<CrudService<City>>,
    state: BelongsTo<State>,
    country: BelongsTo<Country>,
}

impl std::fmt::Debug for CityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityService").finish_non_exhaustive()
    }
}

impl CityService {
    pub fn new(
        records: Arc<CrudService<City>>,
        countries: Arc<CrudService<Country>>,
        states: Arc<CrudService<State>>,
    ) -> Self {
        Self {
            records,
            state: BelongsTo::new(states, "stateId"),
            country: BelongsTo::new(countries, "countryId"),
        }
    }

    pub fn records(&self) -> &CrudService<City> {
        &self.records
    }

    pub async fn create(&self, dto: CreateCityDto) -> Result<City> {
        self.records.create(to_document(&dto)?).await
    }

    pub async fn replace_by_id(&self, id: Uuid, dto: CreateCityDto) -> Result<()> {
        self.records.replace_by_id(id, to_document(&dto)?).await
    }

    pub async fn update_by_id(&self, id: Uuid, dto: UpdateCityDto) -> Result<()> {
        self.records.update_by_id(id, &to_document(&dto)?).await
    }

    pub async fn update_all(&self, dto: UpdateCityDto, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .update_all(&to_document(&dto)?, where_clause.as_ref())
            .await
    }

    pub async fn get_state(&self, id: Uuid) -> Result<State> {
        let city = self.records.find_by_id(id).await?;
        self.state.get(city.state_id).await
    }

    pub async fn get_country(&self, id: Uuid) -> Result<Country> {
        let city = self.records.find_by_id(id).await?;
        self.country.get(city.country_id).await
    }

    /// Countries matching `filter` and the city's `countryId`
    pub async fn find_mapped_countries(&self, id: Uuid, filter: Filter) -> Result<Vec<Country>> {
        let city = self.records.find_by_id(id).await?;
        self.country.find_mapped(city.country_id, filter).await
    }

    /// States matching `filter` and the city's `stateId`
    pub async fn find_mapped_states(&self, id: Uuid, filter: Filter) -> Result<Vec<State>> {
        let city = self.records.find_by_id(id).await?;
        self.state.find_mapped(city.state_id, filter).await
    }
}
