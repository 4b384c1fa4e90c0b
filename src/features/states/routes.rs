use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::states::handlers;
use crate::features::states::services::StateService;

/// Create routes for the states feature
pub fn routes(service: Arc<StateService>) -> Router {
    Router::new()
        .route(
            "/states",
            get(handlers::list_states)
                .post(handlers::create_state)
                .patch(handlers::update_states),
        )
        .route("/states/count", get(handlers::count_states))
        .route(
            "/states/{id}",
            get(handlers::get_state)
                .patch(handlers::update_state)
                .put(handlers::replace_state)
                .delete(handlers::delete_state),
        )
        .route("/states/{id}/country", get(handlers::get_state_country))
        .route(
            "/states/{id}/cities",
            get(handlers::list_state_cities)
                .post(handlers::create_state_city)
                .patch(handlers::update_state_cities)
                .delete(handlers::delete_state_cities),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{city_draft, country_draft, state_draft, test_server};

    #[tokio::test]
    async fn test_state_country_and_cities() {
        let server = test_server();
        server.post("/countries").json(&country_draft()).await.assert_status_ok();
        let country: Value = server.post("/countries").json(&country_draft()).await.json();
        assert_eq!(country["data"]["countryId"], 2);

        let state: Value = server.post("/states").json(&state_draft(2)).await.json();
        let id = state["data"]["id"].as_str().unwrap().to_string();

        let parent: Value = server.get(&format!("/states/{}/country", id)).await.json();
        assert_eq!(parent["data"]["id"], country["data"]["id"]);

        let city: Value = server
            .post(&format!("/states/{}/cities", id))
            .json(&city_draft(9, 9))
            .await
            .json();
        assert_eq!(city["data"]["stateId"], state["data"]["stateId"]);
        assert_eq!(city["data"]["countryId"], 2);

        let cities: Value = server
            .get(&format!("/states/{}/cities", id))
            .add_query_param("filter", json!({"fields": {"name": true}}).to_string())
            .await
            .json();
        assert_eq!(cities["data"], json!([{"name": city["data"]["name"]}]));
    }

    #[tokio::test]
    async fn test_orphan_state_country_is_not_found() {
        let server = test_server();
        let state: Value = server.post("/states").json(&state_draft(5)).await.json();
        let id = state["data"]["id"].as_str().unwrap();

        server
            .get(&format!("/states/{}/country", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_state_without_country_is_rejected() {
        let server = test_server();
        let mut draft = state_draft(1);
        draft.remove("countryId");

        server
            .post("/states")
            .json(&draft)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_states_search_scenario() {
        let server = test_server();
        for _ in 0..2 {
            server.post("/countries").json(&country_draft()).await.assert_status_ok();
        }
        server.post("/states").json(&state_draft(1)).await.assert_status_ok();
        server.post("/states").json(&state_draft(2)).await.assert_status_ok();
        for (country_id, state_id) in [(1, 1), (1, 1), (2, 2)] {
            server
                .post("/cities")
                .json(&city_draft(country_id, state_id))
                .await
                .assert_status_ok();
        }

        let response = server.get("/states/search").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let results = body["data"].as_array().unwrap();

        assert_eq!(results.len(), 3);
        for result in results {
            assert_eq!(result["country"]["countryId"], result["countryId"]);
            assert_eq!(result["state"]["stateId"], result["stateId"]);
            assert!(result["country"]["iso2"].is_string());
        }
        let in_second_country = results.iter().filter(|r| r["countryId"] == 2).count();
        assert_eq!(in_second_country, 1);
    }
}
