//! Shared harness for the HTTP tests: an in-memory database behind the
//! real router, driven with `oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use bakehouse_api::{router, ApiConfig, AppState};
use bakehouse_db::{Database, DbConfig};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// A response with its body already read.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        if self.text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&self.text).unwrap()
        }
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, ApiConfig::default());
        TestApp {
            router: router(state.clone()),
            state,
        }
    }

    /// Bearer token for `tenant_id`.
    pub fn token(&self, tenant_id: &str) -> String {
        self.state
            .jwt
            .issue_token(&format!("user-of-{}", tenant_id), tenant_id)
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            content_type,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Authenticated request as `tenant_id`.
    pub async fn call(
        &self,
        tenant_id: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let token = self.token(tenant_id);
        self.send(method, uri, Some(&token), body).await
    }

    /// Creates an inventory item and returns its id.
    pub async fn add_inventory(
        &self,
        tenant_id: &str,
        name: &str,
        quantity: f64,
        unit: &str,
        cost_cents: i64,
    ) -> String {
        let response = self
            .call(
                tenant_id,
                Method::POST,
                "/api/inventory",
                Some(serde_json::json!({
                    "name": name,
                    "totalQuantity": quantity,
                    "unit": unit,
                    "totalCostCents": cost_cents,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()["id"].as_str().unwrap().to_string()
    }

    /// Creates a product from `(ingredient_id, quantity)` lines and returns its id.
    pub async fn add_product(&self, tenant_id: &str, name: &str, lines: &[(&str, f64)]) -> String {
        let ingredients: Vec<Value> = lines
            .iter()
            .map(|(id, quantity)| serde_json::json!({ "ingredientId": id, "quantity": quantity }))
            .collect();
        let response = self
            .call(
                tenant_id,
                Method::POST,
                "/api/products",
                Some(serde_json::json!({
                    "name": name,
                    "weightGrams": 1000,
                    "ingredients": ingredients,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()["id"].as_str().unwrap().to_string()
    }
}
