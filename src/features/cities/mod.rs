//! Cities feature.
//!
//! Cities reference both their state (`stateId`) and their country
//! (`countryId`) by business id. `/cities/{id}/state` and
//! `/cities/{id}/country` return the single parent; `/city/{id}/state` and
//! `/city/{id}/country` apply a caller filter on top of the key and return
//! arrays.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CityService;
