use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::countries::handlers;
use crate::features::countries::services::CountryService;

/// Create routes for the countries feature
pub fn routes(service: Arc<CountryService>) -> Router {
    Router::new()
        .route(
            "/countries",
            get(handlers::list_countries)
                .post(handlers::create_country)
                .patch(handlers::update_countries),
        )
        .route("/countries/count", get(handlers::count_countries))
        .route(
            "/countries/{id}",
            get(handlers::get_country)
                .patch(handlers::update_country)
                .put(handlers::replace_country)
                .delete(handlers::delete_country),
        )
        .route(
            "/countries/{id}/states",
            get(handlers::list_country_states)
                .post(handlers::create_country_state)
                .patch(handlers::update_country_states)
                .delete(handlers::delete_country_states),
        )
        .route(
            "/countries/{id}/cities",
            get(handlers::list_country_cities)
                .post(handlers::create_country_city)
                .patch(handlers::update_country_cities)
                .delete(handlers::delete_country_cities),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{country_draft, state_draft, test_server};

    #[tokio::test]
    async fn test_country_crud() {
        let server = test_server();

        let response = server.post("/countries").json(&country_draft()).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["countryId"], 1);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let found: Value = server.get(&format!("/countries/{}", id)).await.json();
        assert_eq!(found["data"], body["data"]);

        server
            .patch(&format!("/countries/{}", id))
            .json(&json!({"capital": "Lima"}))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let patched: Value = server.get(&format!("/countries/{}", id)).await.json();
        assert_eq!(patched["data"]["capital"], "Lima");
        assert_eq!(patched["data"]["name"], body["data"]["name"]);

        let mut replacement = country_draft();
        replacement.insert("name".to_string(), json!("Peru"));
        server
            .put(&format!("/countries/{}", id))
            .json(&replacement)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let replaced: Value = server.get(&format!("/countries/{}", id)).await.json();
        assert_eq!(replaced["data"]["name"], "Peru");
        assert_eq!(replaced["data"]["countryId"], 1);

        server
            .delete(&format!("/countries/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/countries/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_count_and_bulk_patch() {
        let server = test_server();
        for _ in 0..3 {
            server.post("/countries").json(&country_draft()).await.assert_status_ok();
        }

        let listed: Value = server
            .get("/countries")
            .add_query_param(
                "filter",
                r#"{"order":["countryId DESC"],"limit":2,"fields":["countryId","name"]}"#,
            )
            .await
            .json();
        let data = listed["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["countryId"], 3);
        assert!(data[0].get("iso2").is_none());

        let patched: Value = server
            .patch("/countries")
            .add_query_param("where", r#"{"countryId":{"gte":2}}"#)
            .json(&json!({"currency": "USD"}))
            .await
            .json();
        assert_eq!(patched["data"]["count"], 2);

        let counted: Value = server
            .get("/countries/count")
            .add_query_param("where", r#"{"currency":"USD"}"#)
            .await
            .json();
        assert_eq!(counted["data"]["count"], 2);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let server = test_server();

        let mut invalid = country_draft();
        invalid.insert("iso2".to_string(), json!("peru"));
        server
            .post("/countries")
            .json(&invalid)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let mut missing = country_draft();
        missing.remove("name");
        server
            .post("/countries")
            .json(&missing)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .get("/countries")
            .add_query_param("filter", r#"{"where":{"population":1}}"#)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/countries")
            .add_query_param("filter", "{not json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get(&format!("/countries/{}", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let created: Value = server.post("/countries").json(&country_draft()).await.json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        server
            .get(&format!("/countries/{}", id))
            .add_query_param("filter", r#"{"fields":["bogus"]}"#)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let mut incomplete = country_draft();
        incomplete.remove("iso3");
        server
            .put(&format!("/countries/{}", id))
            .json(&incomplete)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let unchanged: Value = server.get(&format!("/countries/{}", id)).await.json();
        assert_eq!(unchanged["data"], created["data"]);
    }

    #[tokio::test]
    async fn test_country_states_relation() {
        let server = test_server();
        let created: Value = server.post("/countries").json(&country_draft()).await.json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        let path = format!("/countries/{}/states", id);

        let state: Value = server.post(&path).json(&state_draft(77)).await.json();
        assert_eq!(state["data"]["countryId"], 1);
        server.post("/states").json(&state_draft(2)).await.assert_status_ok();

        let listed: Value = server.get(&path).await.json();
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        server
            .patch(&path)
            .json(&json!({"countryId": 2}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let deleted: Value = server.delete(&path).await.json();
        assert_eq!(deleted["data"]["count"], 1);

        let remaining: Value = server.get("/states/count").await.json();
        assert_eq!(remaining["data"]["count"], 1);
    }

    #[tokio::test]
    async fn test_get_by_id_applies_fields_from_raw_query() {
        let server = test_server();
        let created: Value = server.post("/countries").json(&country_draft()).await.json();
        let id = created["data"]["id"].as_str().unwrap();

        let filter = urlencoding::encode(r#"{"fields":{"iso2":true,"countryId":true}}"#);
        let found: Value = server
            .get(&format!("/countries/{}?filter={}", id, filter))
            .await
            .json();

        assert_eq!(found["data"], json!({"countryId": 1, "iso2": "PE"}));
    }
}
