//! CRUD surfaces and tenant isolation.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

const MISSING_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

#[tokio::test]
async fn inventory_crud() {
    let app = TestApp::new().await;
    let id = app.add_inventory("a", "Sugar", 2000.0, "grams", 9000).await;

    let list = app.call("a", Method::GET, "/api/inventory", None).await.json();
    assert_eq!(list[0]["cost_per_unit"], 4.5);

    let uri = format!("/api/inventory/{}", id);
    let updated = app
        .call(
            "a",
            Method::PUT,
            &uri,
            Some(json!({
                "name": "Brown sugar",
                "totalQuantity": 1000,
                "unit": "grams",
                "totalCostCents": 6000,
            })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["cost_per_unit"], 6.0);

    let response = app.call("a", Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.call("a", Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventory_validation() {
    let app = TestApp::new().await;

    for body in [
        json!({ "name": " ", "totalQuantity": 1, "unit": "grams", "totalCostCents": 100 }),
        json!({ "name": "Eggs", "totalQuantity": 0, "unit": "pieces", "totalCostCents": 100 }),
        json!({ "name": "Eggs", "totalQuantity": 12, "unit": "pieces", "totalCostCents": 0 }),
        json!({ "name": "Eggs", "totalQuantity": 12, "unit": "dozens", "totalCostCents": 100 }),
    ] {
        let response = app.call("a", Method::POST, "/api/inventory", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.text);
    }

    let response = app
        .call("a", Method::DELETE, "/api/inventory/not-a-uuid", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_with_unknown_ingredient_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .call(
            "a",
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Mystery loaf",
                "weightGrams": 400,
                "ingredients": [{ "ingredientId": MISSING_ID, "quantity": 1 }],
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_update_recosts() {
    let app = TestApp::new().await;
    let flour = app.add_inventory("a", "Flour", 1000.0, "grams", 4500).await;
    let id = app.add_product("a", "Bread", &[(&flour, 200.0)]).await;

    let response = app
        .call(
            "a",
            Method::PUT,
            &format!("/api/products/{}", id),
            Some(json!({
                "name": "Big bread",
                "weightGrams": 800,
                "ingredients": [{ "ingredientId": flour, "quantity": 400 }],
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let product = response.json();
    assert_eq!(product["name"], "Big bread");
    assert_eq!(product["total_cost_cents"], 1800);

    let response = app
        .call("a", Method::DELETE, &format!("/api/products/{}", id), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn tenants_do_not_see_each_other() {
    let app = TestApp::new().await;
    let flour = app.add_inventory("a", "Flour", 1000.0, "grams", 4500).await;
    let bread = app.add_product("a", "Bread", &[(&flour, 200.0)]).await;

    let list = app.call("b", Method::GET, "/api/inventory", None).await.json();
    assert!(list.as_array().unwrap().is_empty());

    let response = app
        .call("b", Method::DELETE, &format!("/api/inventory/{}", flour), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // b cannot bill a's product
    let draft = app
        .call("b", Method::POST, "/api/draft/items", Some(json!({ "productId": bread })))
        .await
        .json();
    assert!(draft["items"].as_array().unwrap().is_empty());

    // a's draft is untouched by b
    app.call("a", Method::POST, "/api/draft/items", Some(json!({ "productId": bread })))
        .await;
    let draft = app.call("b", Method::GET, "/api/draft", None).await.json();
    assert!(draft["items"].as_array().unwrap().is_empty());
    let draft = app.call("a", Method::GET, "/api/draft", None).await.json();
    assert_eq!(draft["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn client_held_bill_lifecycle() {
    let app = TestApp::new().await;

    let response = app
        .call(
            "a",
            Method::POST,
            "/api/bills",
            Some(json!({
                "customer": { "name": "Ravi" },
                "items": [{
                    "productId": "p1",
                    "productName": "Cookies",
                    "quantity": 2,
                    "costPriceCents": 10000,
                    "sellingPriceCents": 15000,
                    "totalCents": 1,
                }],
                "additionalCosts": [{ "description": "Box", "amountCents": 2000 }],
                "discountPercent": 10,
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    let bill = response.json();
    // The bogus line total is recomputed
    assert_eq!(bill["items"][0]["total_cents"], 30000);
    assert_eq!(bill["total_cents"], 29000);
    assert_eq!(bill["profit_cents"], 7000);
    assert_eq!(bill["markup_bps"], 5000);

    let uri = format!("/api/bills/{}", bill["id"].as_str().unwrap());

    // Raw overwrite: figures taken verbatim, null clears
    let response = app
        .call(
            "a",
            Method::PUT,
            &uri,
            Some(json!({ "customerName": null, "totalCents": 25000 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let edited = response.json();
    assert!(edited["customer_name"].is_null());
    assert_eq!(edited["total_cents"], 25000);
    assert_eq!(edited["profit_cents"], 7000);

    // Another tenant cannot touch it
    let response = app.call("b", Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.call("a", Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app
        .call("a", Method::GET, &format!("{}/invoice", uri), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_held_bill_without_items_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .call("a", Method::POST, "/api/bills", Some(json!({ "items": [] })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_bill_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .call("a", Method::PUT, &format!("/api/bills/{}", MISSING_ID), Some(json!({})))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_starts_empty_and_merges_updates() {
    let app = TestApp::new().await;

    let profile = app.call("a", Method::GET, "/api/users/profile", None).await.json();
    assert_eq!(profile["tenant_id"], "a");
    assert_eq!(profile["bakery_name"], "");

    app.call(
        "a",
        Method::PUT,
        "/api/users/profile",
        Some(json!({ "bakeryName": "Sweet Crumbs", "bakeryPhone": "98450 00000" })),
    )
    .await;
    let profile = app
        .call(
            "a",
            Method::PUT,
            "/api/users/profile",
            Some(json!({ "name": "Meera" })),
        )
        .await
        .json();

    assert_eq!(profile["name"], "Meera");
    assert_eq!(profile["bakery_name"], "Sweet Crumbs");
    assert_eq!(profile["bakery_phone"], "98450 00000");

    let other = app.call("b", Method::GET, "/api/users/profile", None).await.json();
    assert_eq!(other["bakery_name"], "");
}

#[tokio::test]
async fn client_held_bill_with_repeated_product_is_rejected() {
    let app = TestApp::new().await;
    let line = |price: i64| {
        json!({
            "productId": "p1",
            "productName": "Cookies",
            "quantity": 1,
            "costPriceCents": 10000,
            "sellingPriceCents": price,
        })
    };

    let response = app
        .call(
            "a",
            Method::POST,
            "/api/bills",
            Some(json!({ "items": [line(15000), line(12000)] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].as_str().unwrap().contains("p1"));
    let bills = app.call("a", Method::GET, "/api/bills", None).await.json();
    assert!(bills.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn client_held_bill_with_oversized_quantity_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .call(
            "a",
            Method::POST,
            "/api/bills",
            Some(json!({
                "items": [{
                    "productId": "p1",
                    "productName": "Cookies",
                    "quantity": 1_000_000_000_000_000i64,
                    "costPriceCents": 10000,
                    "sellingPriceCents": 15000,
                }],
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let bills = app.call("a", Method::GET, "/api/bills", None).await.json();
    assert!(bills.as_array().unwrap().is_empty());
}
