use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::sub_regions::handlers;
use crate::features::sub_regions::services::SubRegionService;

/// Create routes for the sub-regions feature
pub fn routes(service: Arc<SubRegionService>) -> Router {
    Router::new()
        .route(
            "/sub-regions",
            get(handlers::list_sub_regions)
                .post(handlers::create_sub_region)
                .patch(handlers::update_sub_regions),
        )
        .route("/sub-regions/count", get(handlers::count_sub_regions))
        .route(
            "/sub-regions/{id}",
            get(handlers::get_sub_region)
                .patch(handlers::update_sub_region)
                .put(handlers::replace_sub_region)
                .delete(handlers::delete_sub_region),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::test_server;

    #[tokio::test]
    async fn test_sub_region_patch_and_list() {
        let server = test_server();
        for name in ["South America", "Central Asia"] {
            server
                .post("/sub-regions")
                .json(&json!({"name": name}))
                .await
                .assert_status_ok();
        }

        let updated: Value = server
            .patch("/sub-regions")
            .add_query_param("where", r#"{"name":{"like":"%Asia"}}"#)
            .json(&json!({"name": "Western Asia"}))
            .await
            .json();
        assert_eq!(updated["data"]["count"], 1);

        let listed: Value = server
            .get("/sub-regions")
            .add_query_param("filter", r#"{"order":"name ASC"}"#)
            .await
            .json();
        let names: Vec<&str> = listed["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["South America", "Western Asia"]);

        server
            .get("/sub-regions/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
