pub mod cities;
pub mod countries;
pub mod regions;
pub mod search;
pub mod states;
pub mod sub_regions;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::features::cities::models::City;
use crate::features::cities::CityService;
use crate::features::countries::models::Country;
use crate::features::countries::CountryService;
use crate::features::regions::models::Region;
use crate::features::regions::RegionService;
use crate::features::search::SearchService;
use crate::features::states::models::State;
use crate::features::states::StateService;
use crate::features::sub_regions::models::SubRegion;
use crate::features::sub_regions::SubRegionService;
use crate::modules::storage::{MemoryRepository, PgRepository, Repository};
use crate::shared::crud::CrudService;

/// One repository per collection, built once at startup and shared
#[derive(Clone)]
pub struct Repositories {
    pub countries: Arc<dyn Repository<Country>>,
    pub states: Arc<dyn Repository<State>>,
    pub cities: Arc<dyn Repository<City>>,
    pub regions: Arc<dyn Repository<Region>>,
    pub sub_regions: Arc<dyn Repository<SubRegion>>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            countries: Arc::new(PgRepository::<Country>::new(pool.clone())),
            states: Arc::new(PgRepository::<State>::new(pool.clone())),
            cities: Arc::new(PgRepository::<City>::new(pool.clone())),
            regions: Arc::new(PgRepository::<Region>::new(pool.clone())),
            sub_regions: Arc::new(PgRepository::<SubRegion>::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            countries: Arc::new(MemoryRepository::<Country>::new()),
            states: Arc::new(MemoryRepository::<State>::new()),
            cities: Arc::new(MemoryRepository::<City>::new()),
            regions: Arc::new(MemoryRepository::<Region>::new()),
            sub_regions: Arc::new(MemoryRepository::<SubRegion>::new()),
        }
    }
}

/// Build the API router over the given repositories
pub fn router(repos: Repositories) -> Router {
    // One CrudService per collection so business id assignment is serialized
    // across every route that creates records in it
    let country_records = Arc::new(CrudService::new(repos.countries.clone()));
    let state_records = Arc::new(CrudService::new(repos.states.clone()));
    let city_records = Arc::new(CrudService::new(repos.cities.clone()));

    let country_service = Arc::new(CountryService::new(
        Arc::clone(&country_records),
        Arc::clone(&state_records),
        Arc::clone(&city_records),
    ));
    let state_service = Arc::new(StateService::new(
        Arc::clone(&state_records),
        Arc::clone(&country_records),
        Arc::clone(&city_records),
    ));
    let city_service = Arc::new(CityService::new(
        city_records,
        country_records,
        state_records,
    ));
    let region_service = Arc::new(RegionService::new(Arc::new(CrudService::new(
        repos.regions,
    ))));
    let sub_region_service = Arc::new(SubRegionService::new(Arc::new(CrudService::new(
        repos.sub_regions,
    ))));
    let search_service = Arc::new(SearchService::new(
        repos.countries,
        repos.states,
        repos.cities,
    ));

    Router::new()
        .merge(countries::routes::routes(country_service))
        .merge(states::routes::routes(state_service))
        .merge(cities::routes::routes(city_service))
        .merge(regions::routes::routes(region_service))
        .merge(sub_regions::routes::routes(sub_region_service))
        .merge(search::routes::routes(search_service))
}
