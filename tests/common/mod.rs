//! Shared helpers for integration tests.
//!
//! Every test app runs against its own `sqlite::memory:` database with
//! migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use account_service::api::{create_router, AppState};
use account_service::config::{Config, DEV_JWT_SECRET};
use account_service::domain::User;
use account_service::infra::Database;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = Config::new("sqlite::memory:", DEV_JWT_SECRET).expect("valid test config");
        let database = Database::connect(&config)
            .await
            .expect("in-memory database should connect");
        let state = AppState::from_config(Arc::new(database), config);

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// Create a user directly through the service, skipping the password policy.
    pub async fn create_user(&self, email: &str, password: &str, name: &str) -> User {
        self.state
            .user_service
            .create_user(email.to_string(), password.to_string(), name.to_string())
            .await
            .expect("fixture user should be created")
    }

    /// Log in through the API and return the issued token.
    pub async fn token_for(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/user/token",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "token request failed: {body}");
        body["token"]
            .as_str()
            .expect("token should be a string")
            .to_string()
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(payload), None).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, token).await
    }

    pub async fn patch_json(&self, uri: &str, payload: Value, token: &str) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(payload), Some(token)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        payload: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        let body = match payload {
            Some(payload) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request should build"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }
}
