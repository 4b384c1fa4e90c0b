use utoipa::{Modify, OpenApi};

use crate::features::cities::{
    dtos as cities_dtos, handlers as cities_handlers, models as cities_models,
};
use crate::features::countries::{
    dtos as countries_dtos, handlers as countries_handlers, models as countries_models,
};
use crate::features::regions::{
    dtos as regions_dtos, handlers as regions_handlers, models as regions_models,
};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers};
use crate::features::states::{
    dtos as states_dtos, handlers as states_handlers, models as states_models,
};
use crate::features::sub_regions::{
    dtos as sub_regions_dtos, handlers as sub_regions_handlers, models as sub_regions_models,
};
use crate::shared::types::{ApiResponse, CountResponseDto, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Countries
        countries_handlers::create_country,
        countries_handlers::count_countries,
        countries_handlers::list_countries,
        countries_handlers::update_countries,
        countries_handlers::get_country,
        countries_handlers::update_country,
        countries_handlers::replace_country,
        countries_handlers::delete_country,
        countries_handlers::list_country_states,
        countries_handlers::create_country_state,
        countries_handlers::update_country_states,
        countries_handlers::delete_country_states,
        countries_handlers::list_country_cities,
        countries_handlers::create_country_city,
        countries_handlers::update_country_cities,
        countries_handlers::delete_country_cities,
        // States
        states_handlers::create_state,
        states_handlers::count_states,
        states_handlers::list_states,
        states_handlers::update_states,
        states_handlers::get_state,
        states_handlers::update_state,
        states_handlers::replace_state,
        states_handlers::delete_state,
        states_handlers::get_state_country,
        states_handlers::list_state_cities,
        states_handlers::create_state_city,
        states_handlers::update_state_cities,
        states_handlers::delete_state_cities,
        // Cities
        cities_handlers::create_city,
        cities_handlers::count_cities,
        cities_handlers::list_cities,
        cities_handlers::update_cities,
        cities_handlers::get_city,
        cities_handlers::update_city,
        cities_handlers::replace_city,
        cities_handlers::delete_city,
        cities_handlers::get_city_state,
        cities_handlers::get_city_country,
        cities_handlers::list_city_countries,
        cities_handlers::list_city_states,
        // Regions
        regions_handlers::create_region,
        regions_handlers::count_regions,
        regions_handlers::list_regions,
        regions_handlers::update_regions,
        regions_handlers::get_region,
        regions_handlers::update_region,
        regions_handlers::replace_region,
        regions_handlers::delete_region,
        // Sub-regions
        sub_regions_handlers::create_sub_region,
        sub_regions_handlers::count_sub_regions,
        sub_regions_handlers::list_sub_regions,
        sub_regions_handlers::update_sub_regions,
        sub_regions_handlers::get_sub_region,
        sub_regions_handlers::update_sub_region,
        sub_regions_handlers::replace_sub_region,
        sub_regions_handlers::delete_sub_region,
        // Search
        search_handlers::search_by_country,
        search_handlers::search_by_state,
        search_handlers::search_by_city,
    ),
    components(
        schemas(
            // Shared
            Meta,
            CountResponseDto,
            ApiResponse<CountResponseDto>,
            // Countries
            countries_models::Country,
            countries_dtos::CreateCountryDto,
            countries_dtos::UpdateCountryDto,
            ApiResponse<countries_models::Country>,
            ApiResponse<Vec<countries_models::Country>>,
            // States
            states_models::State,
            states_dtos::CreateStateDto,
            states_dtos::UpdateStateDto,
            ApiResponse<states_models::State>,
            ApiResponse<Vec<states_models::State>>,
            // Cities
            cities_models::City,
            cities_dtos::CreateCityDto,
            cities_dtos::UpdateCityDto,
            ApiResponse<cities_models::City>,
            ApiResponse<Vec<cities_models::City>>,
            // Regions
            regions_models::Region,
            regions_dtos::CreateRegionDto,
            regions_dtos::UpdateRegionDto,
            ApiResponse<regions_models::Region>,
            ApiResponse<Vec<regions_models::Region>>,
            // Sub-regions
            sub_regions_models::SubRegion,
            sub_regions_dtos::CreateSubRegionDto,
            sub_regions_dtos::UpdateSubRegionDto,
            ApiResponse<sub_regions_models::SubRegion>,
            ApiResponse<Vec<sub_regions_models::SubRegion>>,
            // Search
            search_dtos::CountrySummary,
            search_dtos::StateSummary,
            search_dtos::CitySearchResultDto,
            ApiResponse<Vec<search_dtos::CitySearchResultDto>>,
        )
    ),
    tags(
        (name = "countries", description = "Countries and their states and cities"),
        (name = "states", description = "States and their cities"),
        (name = "cities", description = "Cities and their parent lookups"),
        (name = "regions", description = "World regions"),
        (name = "sub-regions", description = "World sub-regions"),
        (name = "search", description = "City searches joined with country and state"),
    ),
    info(
        title = "Geodata API",
        version = "0.1.0",
        description = "Reference data for countries, states, cities and world regions",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
