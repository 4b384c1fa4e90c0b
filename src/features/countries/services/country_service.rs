use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::cities::dtos::{CreateCityDto, UpdateCityDto};
use crate::features::cities::models::City;
use crate::features::countries::dtos::{CreateCountryDto, UpdateCountryDto};
use crate::features::countries::models::Country;
use crate::features::states::dtos::{CreateStateDto, UpdateStateDto};
use crate::features::states::models::State;
use crate::modules::storage::to_document;
use crate::shared::crud::CrudService;
use crate::shared::filter::{Filter, Where};
use crate::shared::relations::HasMany;

pub struct CountryService {
    records: Arc<CrudService<Country>>,
    states: HasMany<State>,
    cities: HasMany<City>,
}

impl std::fmt::Debug for CountryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountryService").finish_non_exhaustive()
    }
}

impl CountryService {
    pub fn new(
        records: Arc<CrudService<Country>>,
        states: Arc<CrudService<State>>,
        cities: Arc<CrudService<City>>,
    ) -> Self {
        Self {
            records,
            states: HasMany::new(states, "countryId"),
            cities: HasMany::new(cities, "countryId"),
        }
    }

    pub fn records(&self) -> &CrudService<Country> {
        &self.records
    }

    pub async fn create(&self, dto: CreateCountryDto) -> Result<Country> {
        self.records.create(to_document(&dto)?).await
    }

    pub async fn replace_by_id(&self, id: Uuid, dto: CreateCountryDto) -> Result<()> {
        self.records.replace_by_id(id, to_document(&dto)?).await
    }

    pub async fn update_by_id(&self, id: Uuid, dto: UpdateCountryDto) -> Result<()> {
        self.records.update_by_id(id, &to_document(&dto)?).await
    }

    pub async fn update_all(&self, dto: UpdateCountryDto, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .update_all(&to_document(&dto)?, where_clause.as_ref())
            .await
    }

    /// Business id of the country stored under `id`
    async fn owner(&self, id: Uuid) -> Result<i64> {
        Ok(self.records.find_by_id(id).await?.country_id)
    }

    // ==================== States ====================

    pub async fn find_states(&self, id: Uuid, filter: Filter) -> Result<Vec<State>> {
        self.states.find(self.owner(id).await?, filter).await
    }

    pub async fn create_state(&self, id: Uuid, dto: CreateStateDto) -> Result<State> {
        let owner = self.owner(id).await?;
        self.states.create(owner, to_document(&dto)?).await
    }

    pub async fn update_states(
        &self,
        id: Uuid,
        dto: UpdateStateDto,
        where_clause: Option<Where>,
    ) -> Result<u64> {
        let owner = self.owner(id).await?;
        self.states
            .patch(owner, &to_document(&dto)?, where_clause)
            .await
    }

    pub async fn delete_states(&self, id: Uuid, where_clause: Option<Where>) -> Result<u64> {
        self.states.delete(self.owner(id).await?, where_clause).await
    }

    // ==================== Cities ====================

    pub async fn find_cities(&self, id: Uuid, filter: Filter) -> Result<Vec<City>> {
        self.cities.find(self.owner(id).await?, filter).await
    }

    pub async fn create_city(&self, id: Uuid, dto: CreateCityDto) -> Result<City> {
        let owner = self.owner(id).await?;
        self.cities.create(owner, to_document(&dto)?).await
    }

    pub async fn update_cities(
        &self,
        id: Uuid,
        dto: UpdateCityDto,
        where_clause: Option<Where>,
    ) -> Result<u64> {
        let owner = self.owner(id).await?;
        self.cities
            .patch(owner, &to_document(&dto)?, where_clause)
            .await
    }

    pub async fn delete_cities(&self, id: Uuid, where_clause: Option<Where>) -> Result<u64> {
        self.cities.delete(self.owner(id).await?, where_clause).await
    }
}
