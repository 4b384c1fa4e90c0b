use std::sync::Arc;

use crate::core::error::Result;
use crate::features::cities::models::City;
use crate::features::countries::models::Country;
use crate::features::search::dtos::{CitySearchResultDto, CountrySummary, StateSummary};
use crate::features::search::join::{attach, distinct_ids};
use crate::features::states::models::State;
use crate::modules::storage::Repository;
use crate::shared::constants::{CITY_SEARCH_CAP, COUNTRY_SEARCH_CITY_CAP, STATE_SEARCH_CITY_CAP};
use crate::shared::filter::{Filter, Where};

/// Searches returning cities augmented with country and state snapshots.
///
/// Reads go straight to the repositories; nothing here writes.
pub struct SearchService {
    countries: Arc<dyn Repository<Country>>,
    states: Arc<dyn Repository<State>>,
    cities: Arc<dyn Repository<City>>,
}

impl SearchService {
    pub fn new(
        countries: Arc<dyn Repository<Country>>,
        states: Arc<dyn Repository<State>>,
        cities: Arc<dyn Repository<City>>,
    ) -> Self {
        Self {
            countries,
            states,
            cities,
        }
    }

    /// Cities of the countries matching `filter`
    pub async fn search_by_country(&self, filter: &Filter) -> Result<Vec<CitySearchResultDto>> {
        let countries = self.countries.find(filter).await?;
        let country_ids = distinct_ids(&countries, |c| c.country_id);
        if country_ids.is_empty() {
            return Ok(Vec::new());
        }

        let city_filter = lookup("countryId", country_ids.clone()).capped(COUNTRY_SEARCH_CITY_CAP);
        let state_filter = lookup("countryId", country_ids);
        let (cities, states) = futures::try_join!(
            self.cities.find(&city_filter),
            self.states.find(&state_filter)
        )?;

        tracing::debug!(
            "Country search: {} countries, {} states, {} cities",
            countries.len(),
            states.len(),
            cities.len()
        );

        Ok(attach(cities, &country_summaries(&countries), &state_summaries(&states)))
    }

    /// Cities of the states matching `filter`
    pub async fn search_by_state(&self, filter: &Filter) -> Result<Vec<CitySearchResultDto>> {
        let states = self.states.find(filter).await?;
        let state_ids = distinct_ids(&states, |s| s.state_id);
        if state_ids.is_empty() {
            return Ok(Vec::new());
        }
        let country_ids = distinct_ids(&states, |s| s.country_id);

        let city_filter = lookup("stateId", state_ids).capped(STATE_SEARCH_CITY_CAP);
        let country_filter = lookup("countryId", country_ids);
        let (cities, countries) = futures::try_join!(
            self.cities.find(&city_filter),
            self.countries.find(&country_filter)
        )?;

        tracing::debug!(
            "State search: {} states, {} countries, {} cities",
            states.len(),
            countries.len(),
            cities.len()
        );

        Ok(attach(cities, &country_summaries(&countries), &state_summaries(&states)))
    }

    /// Cities matching `filter`, at most `CITY_SEARCH_CAP` of them
    pub async fn search_by_city(&self, filter: &Filter) -> Result<Vec<CitySearchResultDto>> {
        let cities = self
            .cities
            .find(&filter.clone().capped(CITY_SEARCH_CAP))
            .await?;
        if cities.is_empty() {
            return Ok(Vec::new());
        }

        let country_filter = lookup("countryId", distinct_ids(&cities, |c| c.country_id));
        let state_filter = lookup("stateId", distinct_ids(&cities, |c| c.state_id));
        let (countries, states) = futures::try_join!(
            self.countries.find(&country_filter),
            self.states.find(&state_filter)
        )?;

        tracing::debug!(
            "City search: {} cities, {} countries, {} states",
            cities.len(),
            countries.len(),
            states.len()
        );

        Ok(attach(cities, &country_summaries(&countries), &state_summaries(&states)))
    }
}

fn lookup(field: &str, ids: Vec<i64>) -> Filter {
    Filter {
        where_clause: Some(Where::inq(field, ids)),
        ..Default::default()
    }
}

fn country_summaries(countries: &[Country]) -> Vec<CountrySummary> {
    countries.iter().map(CountrySummary::from).collect()
}

fn state_summaries(states: &[State]) -> Vec<StateSummary> {
    states.iter().map(StateSummary::from).collect()
}
