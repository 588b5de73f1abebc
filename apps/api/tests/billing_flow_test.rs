//! The billing workflow end to end: stock → recipe → draft → bill → invoice.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

const TENANT: &str = "sweet-crumbs";

/// Flour ₹45 / kg and butter ₹250 / 500 g; a cake of 500 g flour + 100 g
/// butter costs ₹22.50 + ₹50.00 = ₹72.50.
async fn cake_bakery(app: &TestApp) -> String {
    let flour = app.add_inventory(TENANT, "Flour", 1000.0, "grams", 4500).await;
    let butter = app.add_inventory(TENANT, "Butter", 500.0, "grams", 25000).await;
    app.add_product(TENANT, "Cake", &[(&flour, 500.0), (&butter, 100.0)])
        .await
}

#[tokio::test]
async fn product_is_costed_from_inventory() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;

    let catalog = app
        .call(TENANT, Method::GET, "/api/products/catalog", None)
        .await
        .json();

    assert_eq!(catalog.as_array().unwrap().len(), 1);
    assert_eq!(catalog[0]["id"], cake.as_str());
    assert_eq!(catalog[0]["cost_basis_cents"], 7250);

    let products = app.call(TENANT, Method::GET, "/api/products", None).await.json();
    assert_eq!(products[0]["ingredients"][0]["cost_cents"], 2250);
    assert_eq!(products[0]["ingredients"][1]["cost_cents"], 5000);
}

#[tokio::test]
async fn draft_to_invoice() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;

    // Add the cake and take two
    let draft = app
        .call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": cake })))
        .await
        .json();
    assert_eq!(draft["items"][0]["sellingPriceCents"], 10875);

    let uri = format!("/api/draft/items/{}/quantity", cake);
    let draft = app
        .call(TENANT, Method::PUT, &uri, Some(json!({ "quantity": 2 })))
        .await
        .json();
    assert_eq!(draft["totals"]["subtotalCents"], 21750);

    // Delivery charge
    let response = app.call(TENANT, Method::POST, "/api/draft/costs", None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let cost_id = response.json()["additionalCosts"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/draft/costs/{}", cost_id);
    let response = app
        .call(
            TENANT,
            Method::PATCH,
            &uri,
            Some(json!({ "description": "Delivery", "amountCents": 2000 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // 10 % off the items
    let draft = app
        .call(TENANT, Method::PUT, "/api/draft/discount", Some(json!({ "discountPercent": 10 })))
        .await
        .json();
    assert_eq!(draft["totals"]["discountAmountCents"], 2175);
    assert_eq!(draft["totals"]["totalCents"], 21575);
    assert_eq!(draft["totals"]["profitCents"], 5075);

    app.call(
        TENANT,
        Method::PUT,
        "/api/draft/customer",
        Some(json!({ "name": "  Asha  ", "phone": "", "address": "12 MG Road" })),
    )
    .await;

    // Commit
    let response = app.call(TENANT, Method::POST, "/api/draft/commit", None).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    let bill = response.json();
    assert_eq!(bill["total_cents"], 21575);
    assert_eq!(bill["profit_cents"], 5075);
    assert_eq!(bill["discount_bps"], 1000);
    assert_eq!(bill["customer_name"], "Asha");
    assert!(bill["customer_phone"].is_null());
    assert!(bill["bill_number"].as_str().unwrap().starts_with("BILL-"));

    // Draft starts over at the defaults
    let draft = app.call(TENANT, Method::GET, "/api/draft", None).await.json();
    assert!(draft["items"].as_array().unwrap().is_empty());
    assert_eq!(draft["markupPercent"], 50.0);
    assert_eq!(draft["discountPercent"], 0.0);

    let bills = app.call(TENANT, Method::GET, "/api/bills", None).await.json();
    assert_eq!(bills.as_array().unwrap().len(), 1);

    // Invoice, both renderings
    let id = bill["id"].as_str().unwrap();
    let invoice = app
        .call(TENANT, Method::GET, &format!("/api/bills/{}/invoice", id), None)
        .await
        .json();
    assert_eq!(invoice["bill_number"], bill["bill_number"]);
    assert_eq!(invoice["pages"].as_array().unwrap().len(), 1);

    let text = app
        .call(TENANT, Method::GET, &format!("/api/bills/{}/invoice?format=text", id), None)
        .await;
    assert_eq!(text.status, StatusCode::OK);
    assert!(text.content_type.unwrap().starts_with("text/plain"));
    assert!(text.text.contains(bill["bill_number"].as_str().unwrap()));

    // Dashboard sees the sale
    let dashboard = app.call(TENANT, Method::GET, "/api/dashboard", None).await.json();
    assert_eq!(dashboard["bill_count"], 1);
    assert_eq!(dashboard["revenue"], 21575);
    assert_eq!(dashboard["profit"], 5075);
    assert_eq!(dashboard["inventory_count"], 2);
    assert_eq!(dashboard["product_count"], 1);
}

#[tokio::test]
async fn empty_draft_cannot_be_committed() {
    let app = TestApp::new().await;

    let response = app.call(TENANT, Method::POST, "/api/draft/commit", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
    let bills = app.call(TENANT, Method::GET, "/api/bills", None).await.json();
    assert!(bills.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_product_leaves_draft_unchanged() {
    let app = TestApp::new().await;

    let response = app
        .call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": "ghost" })))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn markup_change_discards_manual_price() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;
    app.call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": cake })))
        .await;

    let uri = format!("/api/draft/items/{}/price", cake);
    let draft = app
        .call(TENANT, Method::PUT, &uri, Some(json!({ "sellingPriceCents": 9000 })))
        .await
        .json();
    assert_eq!(draft["items"][0]["sellingPriceCents"], 9000);

    let draft = app
        .call(TENANT, Method::PUT, "/api/draft/markup", Some(json!({ "markupPercent": 100 })))
        .await
        .json();
    assert_eq!(draft["items"][0]["sellingPriceCents"], 14500);
    assert_eq!(draft["markupPercent"], 100.0);
}

#[tokio::test]
async fn invalid_draft_edits_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .call(TENANT, Method::PUT, "/api/draft/discount", Some(json!({ "discountPercent": 150 })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .call(TENANT, Method::PUT, "/api/draft/markup", Some(json!({ "markupPercent": -5 })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .call(TENANT, Method::DELETE, "/api/draft/costs/missing", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .call(TENANT, Method::PUT, "/api/draft/markup", Some(json!({ "markup": "lots" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn reset_restores_defaults() {
    let app = TestApp::new().await;
    app.call(TENANT, Method::PUT, "/api/draft/markup", Some(json!({ "markupPercent": 80 })))
        .await;
    app.call(TENANT, Method::POST, "/api/draft/costs", None).await;

    let draft = app.call(TENANT, Method::DELETE, "/api/draft", None).await.json();

    assert_eq!(draft["markupPercent"], 50.0);
    assert!(draft["additionalCosts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_quantity_is_rejected_and_draft_kept() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;
    app.call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": cake })))
        .await;

    let uri = format!("/api/draft/items/{}/quantity", cake);
    let response = app
        .call(
            TENANT,
            Method::PUT,
            &uri,
            Some(json!({ "quantity": 1_000_000_000_000_000i64 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");

    // The draft still reads back, untouched
    let response = app.call(TENANT, Method::GET, "/api/draft", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let draft = response.json();
    assert_eq!(draft["items"][0]["quantity"], 1);
    assert_eq!(draft["totals"]["subtotalCents"], 10875);

    // And keeps accepting edits
    let draft = app
        .call(TENANT, Method::PUT, &uri, Some(json!({ "quantity": 3 })))
        .await
        .json();
    assert_eq!(draft["totals"]["subtotalCents"], 32625);
}

#[tokio::test]
async fn oversized_markup_is_rejected() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;
    app.call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": cake })))
        .await;

    let response = app
        .call(TENANT, Method::PUT, "/api/draft/markup", Some(json!({ "markupPercent": 1e12 })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let draft = app.call(TENANT, Method::GET, "/api/draft", None).await.json();
    assert_eq!(draft["markupPercent"], 50.0);
    assert_eq!(draft["items"][0]["sellingPriceCents"], 10875);
}

#[tokio::test]
async fn overlapping_commit_is_refused() {
    let app = TestApp::new().await;
    let cake = cake_bakery(&app).await;
    app.call(TENANT, Method::POST, "/api/draft/items", Some(json!({ "productId": cake })))
        .await;

    // Another request is mid-commit for this tenant
    let in_flight = app.state.drafts.begin_commit(TENANT).unwrap();
    let response = app.call(TENANT, Method::POST, "/api/draft/commit", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["code"], "CONFLICT");

    // Other tenants are not held up
    let response = app.call("other", Method::POST, "/api/draft/commit", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    drop(in_flight);
    let response = app.call(TENANT, Method::POST, "/api/draft/commit", None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let bills = app.call(TENANT, Method::GET, "/api/bills", None).await.json();
    assert_eq!(bills.as_array().unwrap().len(), 1);
}
