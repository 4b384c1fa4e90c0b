use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::cities::models::City;
use crate::features::countries::models::Country;
use crate::features::states::models::State;

/// Country snapshot attached to a city search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub id: Uuid,
    pub country_id: i64,
    pub name: String,
    pub iso2: String,
}

impl From<&Country> for CountrySummary {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            country_id: country.country_id,
            name: country.name.clone(),
            iso2: country.iso2.clone(),
        }
    }
}

/// State snapshot attached to a city search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub id: Uuid,
    pub state_id: i64,
    pub name: String,
    pub state_code: Option<String>,
}

impl From<&State> for StateSummary {
    fn from(state: &State) -> Self {
        Self {
            id: state.id,
            state_id: state.state_id,
            name: state.name.clone(),
            state_code: state.state_code.clone(),
        }
    }
}

/// City with its parents resolved at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CitySearchResultDto {
    #[serde(flatten)]
    pub city: City,
    /// Absent when no country carries the city's `countryId`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<CountrySummary>,
    /// Absent when no state carries the city's `stateId`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<StateSummary>,
}
