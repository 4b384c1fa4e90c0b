use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionService;

/// Create routes for the regions feature
pub fn routes(service: Arc<RegionService>) -> Router {
    Router::new()
        .route(
            "/regions",
            get(handlers::list_regions)
                .post(handlers::create_region)
                .patch(handlers::update_regions),
        )
        .route("/regions/count", get(handlers::count_regions))
        .route(
            "/regions/{id}",
            get(handlers::get_region)
                .patch(handlers::update_region)
                .put(handlers::replace_region)
                .delete(handlers::delete_region),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::test_server;

    #[tokio::test]
    async fn test_region_crud() {
        let server = test_server();

        let created: Value = server
            .post("/regions")
            .json(&json!({"name": "Americas"}))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["name"], "Americas");

        server
            .put(&format!("/regions/{}", id))
            .json(&json!({"name": "Asia"}))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let counted: Value = server
            .get("/regions/count")
            .add_query_param("where", r#"{"name":"Asia"}"#)
            .await
            .json();
        assert_eq!(counted["data"]["count"], 1);

        server
            .post("/regions")
            .json(&json!({"name": ""}))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .delete(&format!("/regions/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/regions/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
