//! Common test utilities for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use cinelog_api::{AppState, create_router};
use cinelog_auth::{JwtManager, hash_password, parse_algorithm};
use cinelog_db::{Database, NewUser, User};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Decoded response of a single request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }
}

/// Router wired to a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn test_app() -> TestApp {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    let jwt = Arc::new(JwtManager::new(
        TEST_SECRET,
        parse_algorithm("HS256").unwrap(),
        30,
    )
    .unwrap());
    let state = AppState::new(db, jwt);

    TestApp {
        router: create_router(state.clone(), None),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username, password
            )))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/users",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "full_name": format!("{} Example", username),
                "password": password,
            })),
        )
        .await
    }

    /// Register an account and return a bearer token for it
    pub async fn register_and_login(&self, username: &str, password: &str) -> (i64, String) {
        let registered = self.register(username, password).await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let login = self.login(username, password).await;
        assert_eq!(login.status, StatusCode::OK);

        (
            registered.body["id"].as_i64().unwrap(),
            login.body["access_token"].as_str().unwrap().to_string(),
        )
    }

    /// Insert an account directly, bypassing registration
    pub async fn insert_user(&self, username: &str, password: &str, disabled: bool) -> User {
        self.state
            .db
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                full_name: username.to_string(),
                password_hash: hash_password(password).unwrap(),
                disabled,
            })
            .await
            .unwrap()
    }
}
