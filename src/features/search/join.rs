//! Denormalized join of cities with their country and state.
//!
//! A city keeps only the business ids of its parents; search results carry a
//! small snapshot of each parent resolved at query time.

use std::collections::HashSet;

use crate::features::cities::models::City;
use crate::features::search::dtos::{CitySearchResultDto, CountrySummary, StateSummary};

/// Distinct keys in first-seen order
pub fn distinct_ids<T>(items: &[T], key: impl Fn(&T) -> i64) -> Vec<i64> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(key)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Attach each city's country and state snapshot.
///
/// Lookup is a linear scan; with duplicate business ids the first summary
/// wins. A city whose parent is missing gets no snapshot.
pub fn attach(
    cities: Vec<City>,
    countries: &[CountrySummary],
    states: &[StateSummary],
) -> Vec<CitySearchResultDto> {
    cities
        .into_iter()
        .map(|city| {
            let country = countries
                .iter()
                .find(|c| c.country_id == city.country_id)
                .cloned();
            let state = states.iter().find(|s| s.state_id == city.state_id).cloned();

            CitySearchResultDto {
                city,
                country,
                state,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn city(city_id: i64, country_id: i64, state_id: i64) -> City {
        City {
            id: Uuid::now_v7(),
            city_id,
            name: format!("City {}", city_id),
            country_id,
            state_id,
            country_code: None,
            state_code: None,
            latitude: "0".to_string(),
            longitude: "0".to_string(),
        }
    }

    fn country(country_id: i64, name: &str) -> CountrySummary {
        CountrySummary {
            id: Uuid::now_v7(),
            country_id,
            name: name.to_string(),
            iso2: "PE".to_string(),
        }
    }

    #[test]
    fn test_distinct_ids_keeps_first_seen_order() {
        let cities = vec![city(1, 5, 9), city(2, 5, 3), city(3, 2, 9), city(4, 5, 9)];

        assert_eq!(distinct_ids(&cities, |c| c.country_id), vec![5, 2]);
        assert_eq!(distinct_ids(&cities, |c| c.state_id), vec![9, 3]);
        assert!(distinct_ids(&Vec::<City>::new(), |c| c.city_id).is_empty());
    }

    #[test]
    fn test_attach_matching_country() {
        let countries = vec![country(1, "Peru"), country(2, "Chile")];

        let results = attach(vec![city(1, 2, 1)], &countries, &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].country.as_ref().unwrap().name, "Chile");
        assert!(results[0].state.is_none());
    }

    #[test]
    fn test_attach_unmatched_is_absent_from_json() {
        let results = attach(vec![city(1, 7, 7)], &[country(1, "Peru")], &[]);

        let json = serde_json::to_value(&results[0]).unwrap();
        assert!(json.get("country").is_none());
        assert!(json.get("state").is_none());
        assert_eq!(json["cityId"], 1);
        assert_eq!(json["countryId"], 7);
    }

    #[test]
    fn test_attach_first_duplicate_wins() {
        let countries = vec![country(1, "First"), country(1, "Second")];

        let results = attach(vec![city(1, 1, 1)], &countries, &[]);

        assert_eq!(results[0].country.as_ref().unwrap().name, "First");
    }
}
