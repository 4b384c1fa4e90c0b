//! City searches joined with country and state snapshots.
//!
//! | Method | Endpoint | Cities returned |
//! |--------|----------|-----------------|
//! | GET | `/countries/search` | of the countries matching `filter`, max 300 |
//! | GET | `/states/search` | of the states matching `filter`, max 300 |
//! | GET | `/cities/search` | matching `filter`, max 200 |

pub mod dtos;
pub mod handlers;
pub mod join;
pub mod routes;
pub mod services;

pub use services::SearchService;
