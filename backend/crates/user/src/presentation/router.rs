//! User Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::UserRepository;
use crate::infra::PgUserRepository;
use crate::presentation::handlers::{self, UserAppState};

/// Named routes, relative to the module's mount prefix
pub const NAMED_ROUTES: &[(&str, &str)] = &[
    ("users.register", "/users"),
    ("users.show", "/users/{id}"),
];

/// Create the User router with PostgreSQL repository
pub fn user_router(repo: PgUserRepository) -> Router {
    user_router_generic(repo)
}

/// Create a User router for any repository implementation
pub fn user_router_generic<R>(repo: R) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = UserAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/users", post(handlers::register::<R>))
        .route("/users/{id}", get(handlers::show::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryUserRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_created_envelope() {
        let app = user_router_generic(InMemoryUserRepository::default());

        let response = app
            .oneshot(register_request(json!({
                "email": "ada@example.com",
                "name": "Ada",
                "password": "correct horse battery"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User registered");
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert!(body["data"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_register_validation_failure() {
        let app = user_router_generic(InMemoryUserRepository::default());

        let response = app
            .oneshot(register_request(json!({
                "email": "nope",
                "name": "",
                "password": "short"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Validation failed");
        assert_eq!(
            body["error"]["details"]["email"][0],
            "The email field must be a valid email address."
        );
        assert!(body["error"]["details"]["name"].is_array());
        assert!(body["error"]["details"]["password"].is_array());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let app = user_router_generic(InMemoryUserRepository::default());
        let payload = json!({
            "email": "ada@example.com",
            "name": "Ada",
            "password": "correct horse battery"
        });

        let first = app
            .clone()
            .oneshot(register_request(payload.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.oneshot(register_request(payload)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["error"]["code"], "EMAIL_TAKEN");
        assert_eq!(body["error"]["details"], Value::Null);
    }

    #[tokio::test]
    async fn test_show_unknown_user_is_not_found() {
        let app = user_router_generic(InMemoryUserRepository::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_show_registered_user() {
        let app = user_router_generic(InMemoryUserRepository::default());

        let created = app
            .clone()
            .oneshot(register_request(json!({
                "email": "ada@example.com",
                "name": "Ada",
                "password": "correct horse battery"
            })))
            .await
            .unwrap();
        let id = body_json(created).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/users/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["name"], "Ada");
        assert!(body.get("message").is_none());
    }
}
