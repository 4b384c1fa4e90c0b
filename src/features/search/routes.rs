use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::search::handlers;
use crate::features::search::services::SearchService;

/// Create routes for the search endpoints
pub fn routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/countries/search", get(handlers::search_by_country))
        .route("/states/search", get(handlers::search_by_state))
        .route("/cities/search", get(handlers::search_by_city))
        .with_state(service)
}
