//! Structure API Integration Tests
//!
//! Drives the full router (auth, handlers, error mapping) against a
//! temporary libsql database without binding a socket.

#[cfg(test)]
mod structure_api_tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use structree_core::db::{DatabaseService, TursoStore};
    use structree_core::StructureService;
    use structree_server::api::{cors_layer, Claims, TokenVerifier};
    use structree_server::{create_router, AppState};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    /// Returns (router, _temp_dir) - temp_dir must be kept alive for test duration
    async fn create_test_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = DatabaseService::new(temp_dir.path().join("api.db"))
            .await
            .unwrap();
        let store = Arc::new(TursoStore::new(Arc::new(db)));
        let state = AppState::new(StructureService::new(store), TokenVerifier::new(SECRET));

        (create_router(state, cors_layer(None)), temp_dir)
    }

    fn token_for(user: &str) -> String {
        let claims = Claims {
            sub: user.to_string(),
            exp: get_current_timestamp() + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn org_chart() -> Value {
        json!({
            "label": "Org",
            "nodes": [
                {"label": "CEO", "parent_id": null},
                {"label": "CTO", "parent_id": "CEO"},
                {"label": "Engineer", "parent_id": "CTO"}
            ]
        })
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let (app, _temp) = create_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_structure_routes_require_token() {
        let (app, _temp) = create_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/structures", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let request = Request::builder()
            .uri("/api/structures")
            .header(header::AUTHORIZATION, "Bearer forged.token.value")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_read_tree_and_edit_form() {
        let (app, _temp) = create_test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/structures",
            Some("alice"),
            Some(org_chart()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Structure saved successfully.");
        assert_eq!(body["structure"]["label"], "Org");
        let id = body["structure"]["id"].as_str().unwrap().to_string();

        let (status, tree) = send(
            &app,
            Method::GET,
            &format!("/api/structures/{}/tree", id),
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tree["label"], "CEO");
        assert_eq!(tree["children"][0]["label"], "CTO");
        assert_eq!(tree["children"][0]["children"][0]["label"], "Engineer");

        let (status, form) = send(
            &app,
            Method::GET,
            &format!("/api/structures/{}/edit", id),
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(form, org_chart());
    }

    #[tokio::test]
    async fn test_validation_errors_are_422_with_message() {
        let (app, _temp) = create_test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/structures",
            Some("alice"),
            Some(json!({
                "label": "S",
                "nodes": [{"label": "X", "parent_id": null}, {"label": "X", "parent_id": null}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Duplicate node label"));
    }

    #[tokio::test]
    async fn test_update_ignores_node_ids_and_replaces_nodes() {
        let (app, _temp) = create_test_app().await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/structures",
            Some("alice"),
            Some(org_chart()),
        )
        .await;
        let id = created["structure"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/structures/{}", id),
            Some("alice"),
            Some(json!({
                "label": "Org v2",
                "nodes": [{"id": "stale-id", "label": "R", "parent_id": null}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Structure updated successfully.");
        let nodes = body["structure"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["label"], "R");
        assert_ne!(nodes[0]["id"], "stale-id");
    }

    #[tokio::test]
    async fn test_other_users_structures_are_not_found() {
        let (app, _temp) = create_test_app().await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/structures",
            Some("alice"),
            Some(org_chart()),
        )
        .await;
        let uri = format!("/api/structures/{}", created["structure"]["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, &uri, Some("mallory"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STRUCTURE_NOT_FOUND");

        let (status, _) = send(&app, Method::DELETE, &uri, Some("mallory"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = send(&app, Method::GET, "/api/structures", Some("mallory"), None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (app, _temp) = create_test_app().await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/structures",
            Some("alice"),
            Some(org_chart()),
        )
        .await;
        let uri = format!("/api/structures/{}", created["structure"]["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, Some("alice"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Structure deleted successfully.");

        let (status, _) = send(&app, Method::GET, &uri, Some("alice"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_builds_virtual_root_without_saving() {
        let (app, _temp) = create_test_app().await;

        let (status, tree) = send(
            &app,
            Method::POST,
            "/api/structures/preview",
            Some("alice"),
            Some(json!({
                "label": "Draft",
                "nodes": [
                    {"label": "A", "parent_id": null},
                    {"label": "B", "parent_id": null},
                    {"label": "", "parent_id": null},
                    {"label": "C", "parent_id": "A"}
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(tree["label"], "Root");
        assert_eq!(tree["children"][0]["label"], "A");
        assert_eq!(tree["children"][1]["label"], "B");
        assert_eq!(tree["children"][0]["children"][0]["label"], "C");

        let (_, listed) = send(&app, Method::GET, "/api/structures", Some("alice"), None).await;
        assert_eq!(listed, json!([]));
    }
}
