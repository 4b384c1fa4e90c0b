use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::cities::handlers;
use crate::features::cities::services::CityService;

/// Create routes for the cities feature
pub fn routes(service: Arc<CityService>) -> Router {
    Router::new()
        .route(
            "/cities",
            get(handlers::list_cities)
                .post(handlers::create_city)
                .patch(handlers::update_cities),
        )
        .route("/cities/count", get(handlers::count_cities))
        .route(
            "/cities/{id}",
            get(handlers::get_city)
                .patch(handlers::update_city)
                .put(handlers::replace_city)
                .delete(handlers::delete_city),
        )
        .route("/cities/{id}/state", get(handlers::get_city_state))
        .route("/cities/{id}/country", get(handlers::get_city_country))
        // Filtered parent lookups live under the singular prefix
        .route("/city/{id}/country", get(handlers::list_city_countries))
        .route("/city/{id}/state", get(handlers::list_city_states))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{city_draft, country_draft, state_draft, test_server};

    #[tokio::test]
    async fn test_city_parents() {
        let server = test_server();
        let country: Value = server.post("/countries").json(&country_draft()).await.json();
        let state: Value = server.post("/states").json(&state_draft(1)).await.json();
        let city: Value = server.post("/cities").json(&city_draft(1, 1)).await.json();
        let id = city["data"]["id"].as_str().unwrap().to_string();

        let parent: Value = server.get(&format!("/cities/{}/state", id)).await.json();
        assert_eq!(parent["data"], state["data"]);

        let parent: Value = server.get(&format!("/cities/{}/country", id)).await.json();
        assert_eq!(parent["data"], country["data"]);

        let mapped: Value = server
            .get(&format!("/city/{}/country", id))
            .add_query_param("filter", json!({"fields": ["name"]}).to_string())
            .await
            .json();
        assert_eq!(mapped["data"], json!([{"name": country["data"]["name"]}]));

        let mapped: Value = server
            .get(&format!("/city/{}/state", id))
            .add_query_param("filter", json!({"where": {"stateId": 99}}).to_string())
            .await
            .json();
        assert_eq!(mapped["data"], json!([]));
    }

    #[tokio::test]
    async fn test_city_with_missing_parent() {
        let server = test_server();
        let city: Value = server.post("/cities").json(&city_draft(3, 4)).await.json();
        let id = city["data"]["id"].as_str().unwrap();

        server
            .get(&format!("/cities/{}/state", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format!("/cities/{}/country", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let mapped: Value = server.get(&format!("/city/{}/country", id)).await.json();
        assert_eq!(mapped["data"], json!([]));
    }

    #[tokio::test]
    async fn test_cities_search_projects_city_fields() {
        let server = test_server();
        server.post("/countries").json(&country_draft()).await.assert_status_ok();
        server.post("/cities").json(&city_draft(1, 8)).await.assert_status_ok();

        let body: Value = server
            .get("/cities/search")
            .add_query_param("filter", json!({"fields": ["cityId", "name"]}).to_string())
            .await
            .json();
        let results = body["data"].as_array().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["cityId"], 1);
        assert!(results[0].get("latitude").is_none());
        assert_eq!(results[0]["country"]["countryId"], 1);
        assert!(results[0].get("state").is_none());
    }
}
