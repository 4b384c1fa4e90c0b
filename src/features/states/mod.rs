//! States feature: first-level subdivisions of a country.
//!
//! States reference their country through `countryId` (the country's
//! business id). Besides plain CRUD, `/states/{id}/country` resolves the
//! parent and `/states/{id}/cities` manages the state's cities.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::StateService;
