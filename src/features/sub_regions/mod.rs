//! Sub-regions (South America, Western Europe, ...). Plain CRUD.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SubRegionService;
