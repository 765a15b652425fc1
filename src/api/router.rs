use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::state::AppState;
use super::{health, users};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::HealthProbe;
    use crate::infrastructure::user::{InMemoryUserRepository, SaltedSha256Hasher, UserService};

    struct StaticProbe {
        healthy: bool,
    }

    #[async_trait]
    impl HealthProbe for StaticProbe {
        async fn ping(&self) -> Result<(), DomainError> {
            if self.healthy {
                Ok(())
            } else {
                Err(DomainError::database("connection refused"))
            }
        }
    }

    fn test_app(healthy: bool) -> Router {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(SaltedSha256Hasher::new("test-salt"));
        let state = AppState {
            user_service: Arc::new(UserService::new(repository, hasher)),
            database: Arc::new(StaticProbe { healthy }),
        };
        create_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn jane() -> Value {
        json!({
            "email": "jane@example.com",
            "first_name": "Jane",
            "last_name": "Doe",
            "password": "password123"
        })
    }

    #[tokio::test]
    async fn test_create_user_returns_201_without_password() {
        let app = test_app(true);

        let (status, body) = send(&app, "POST", "/users", Some(jane())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["is_active"], true);
        assert!(body["id"].is_string());
        assert!(body["created_at"].is_string());

        // No password of any kind in the response
        let serialized = body.to_string();
        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("password123"));
    }

    #[tokio::test]
    async fn test_create_user_missing_field_is_business_error() {
        let app = test_app(true);

        let (status, body) = send(
            &app,
            "POST",
            "/users",
            Some(json!({"email": "jane@example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "business_error");
        assert_eq!(body["status_code"], 400);
        assert_eq!(body["message"], "Missing required field: first_name");
    }

    #[tokio::test]
    async fn test_create_user_malformed_body_is_validation_error() {
        let app = test_app(true);

        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let app = test_app(true);

        send(&app, "POST", "/users", Some(jane())).await;
        let (status, body) = send(&app, "POST", "/users", Some(jane())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "business_error");
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_404_envelope() {
        let app = test_app(true);

        let (status, body) = send(&app, "GET", "/users/missing", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["status_code"], 404);
    }

    #[tokio::test]
    async fn test_list_users_with_lenient_pagination() {
        let app = test_app(true);
        send(&app, "POST", "/users", Some(jane())).await;

        let (status, body) = send(&app, "GET", "/users?limit=abc&offset=xyz", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 100);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_users_filters_on_is_active() {
        let app = test_app(true);
        send(&app, "POST", "/users", Some(jane())).await;
        send(
            &app,
            "POST",
            "/users",
            Some(json!({
                "email": "bob@example.com",
                "first_name": "Bob",
                "last_name": "Smith",
                "password": "password123",
                "is_active": false
            })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/users?is_active=false", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let app = test_app(true);
        let (_, created) = send(&app, "POST", "/users", Some(jane())).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/users/{id}"),
            Some(json!({"first_name": "Janet"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Janet");
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["is_active"], true);
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_404() {
        let app = test_app(true);

        let (status, body) = send(
            &app,
            "PUT",
            "/users/missing",
            Some(json!({"first_name": "Janet"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_user_returns_204_then_404() {
        let app = test_app(true);
        let (_, created) = send(&app, "POST", "/users", Some(jane())).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(&app, "DELETE", &format!("/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "GET", &format!("/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &format!("/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_healthy() {
        let app = test_app(true);

        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["components"]["database"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_health_unhealthy() {
        let app = test_app(false);

        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["components"]["database"], "unhealthy");
    }
}
