//! World regions (Africa, Americas, Asia, ...).
//!
//! Plain CRUD; countries carry the region name as free text, so there is no
//! relation to maintain.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RegionService;
