//! Session handling on the HTTP surface.

mod common;

use axum::http::{Method, StatusCode};

use bakehouse_api::auth::JwtManager;
use common::TestApp;

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/api/inventory", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let body = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Access token required");
}

#[tokio::test]
async fn garbage_token_is_forbidden() {
    let app = TestApp::new().await;

    let response = app
        .send(Method::GET, "/api/draft", Some("not-a-jwt"), None)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["code"], "FORBIDDEN");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_forbidden() {
    let app = TestApp::new().await;
    let token = JwtManager::new("someone-elses-secret", 3600)
        .issue_token("u1", "bakery-a")
        .unwrap();

    let response = app
        .send(Method::GET, "/api/products", Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_token_is_forbidden() {
    let app = TestApp::new().await;
    let token = JwtManager::new(app.state.config.jwt_secret.clone(), -3600)
        .issue_token("u1", "bakery-a")
        .unwrap();

    let response = app
        .send(Method::GET, "/api/dashboard", Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/api/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["code"], "NOT_FOUND");
}
