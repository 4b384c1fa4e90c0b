//! Countries feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/countries` | Create a country |
//! | GET | `/countries` | List countries (`filter`) |
//! | PATCH | `/countries` | Patch countries matching `where` |
//! | GET | `/countries/count` | Count countries matching `where` |
//! | GET/PATCH/PUT/DELETE | `/countries/{id}` | Single country |
//! | GET/POST/PATCH/DELETE | `/countries/{id}/states` | States of a country |
//! | GET/POST/PATCH/DELETE | `/countries/{id}/cities` | Cities of a country |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CountryService;
