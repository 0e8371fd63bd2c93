mod common;

use std::str::FromStr;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn decimal(value: &Value) -> Decimal {
    let raw = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
    Decimal::from_str(&raw).expect("decimal value").round_dp(2)
}

fn screen_payload(location_id: &str) -> Value {
    json!({
        "name": "iPhone 14 Screen",
        "category": "Screens",
        "brand": "Apple",
        "variations": [{
            "name": "OEM",
            "sku": "IP14-SCR-OEM",
            "raw_price": "80",
            "tax": "10",
            "shipping": "4",
            "markup": "25",
            "stock_levels": [{ "location_id": location_id, "quantity": 3 }]
        }]
    })
}

#[tokio::test]
async fn status_and_health_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = response_json(response).await;
    assert_eq!(body["data"]["service"], "repair-shop-api");

    let response = app.request(Method::GET, "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}

#[tokio::test]
async fn inventory_crud_over_http() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(screen_payload(&downtown.id.to_string())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    let item_id = body["data"]["id"].as_str().expect("item id").to_string();
    let variation = &body["data"]["variations"][0];
    // 80 + 8 tax + 4 shipping = 92, +25% markup = 115
    assert_eq!(decimal(&variation["cost"]), dec!(92));
    assert_eq!(decimal(&variation["total_cost"]), dec!(115));
    assert_eq!(decimal(&variation["profit"]), dec!(23));
    assert_eq!(variation["total_stock"], 3);

    let response = app.request(Method::GET, "/api/v1/inventory", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["variation_count"], 1);
    assert_eq!(body["data"]["items"][0]["total_stock"], 3);

    let uri = format!("/api/v1/inventory/{}/duplicate", item_id);
    let response = app.request(Method::POST, &uri, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "iPhone 14 Screen (Copy)");
    assert_eq!(body["data"]["variations"][0]["sku"], "IP14-SCR-OEM-COPY");

    let uri = format!("/api/v1/inventory/{}", item_id);
    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({ "name": "", "variations": [] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/pricing/preview",
            Some(json!({ "raw_price": "10", "tax": "150" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/default-rates",
            Some(json!({ "tax_rate": "101", "shipping_rate": "5" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stock_endpoints_set_and_adjust() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let mall = app.create_location("Westside Mall").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(screen_payload(&downtown.id.to_string())),
        )
        .await;
    let body = response_json(response).await;
    let variation_id = body["data"]["variations"][0]["id"]
        .as_str()
        .expect("variation id")
        .to_string();

    let uri = format!("/api/v1/variations/{}/stock/{}", variation_id, mall.id);
    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "quantity": 4, "purchase_cost": "55.10" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity"], 4);

    let uri = format!(
        "/api/v1/variations/{}/stock/{}/adjust",
        variation_id, downtown.id
    );
    let response = app
        .request(Method::POST, &uri, Some(json!({ "delta": -2 })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity"], 1);

    let response = app
        .request(Method::POST, &uri, Some(json!({ "delta": -5 })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let uri = format!("/api/v1/variations/{}/stock", variation_id);
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let levels = body["data"].as_array().expect("levels");
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0]["location_name"], "Downtown");
    assert_eq!(levels[0]["quantity"], 1);
    assert_eq!(levels[1]["location_name"], "Westside Mall");
}

#[tokio::test]
async fn default_rates_and_preview() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/settings/default-rates", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["persisted"], false);

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/default-rates",
            Some(json!({ "tax_rate": "10", "shipping_rate": "2" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["repriced_variations"], 0);

    let response = app
        .request(
            Method::POST,
            "/api/v1/pricing/preview",
            Some(json!({ "raw_price": "200", "markup": "10", "use_default_rates": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(decimal(&body["data"]["tax_percent"]), dec!(10));
    assert_eq!(decimal(&body["data"]["shipping_amount"]), dec!(4));
    assert_eq!(decimal(&body["data"]["cost"]), dec!(224));
    assert_eq!(decimal(&body["data"]["total_cost"]), dec!(246.40));
}

#[tokio::test]
async fn catalog_and_blog_endpoints() {
    let app = TestApp::new().await;
    repair_shop_api::seed::seed_all(&app.state.db, app.state.config.fallback_rates())
        .await
        .expect("seed");

    let response = app.request(Method::GET, "/api/v1/locations", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let response = app.request(Method::GET, "/api/v1/devices/brands", None).await;
    let body = response_json(response).await;
    let brands = body["data"].as_array().expect("brands").clone();
    assert_eq!(brands.len(), 3);
    let apple_id = brands
        .iter()
        .find(|b| b["name"] == "Apple")
        .and_then(|b| b["id"].as_str())
        .expect("apple id")
        .to_string();

    let uri = format!("/api/v1/devices/brands/{}/series", apple_id);
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let uri = format!("/api/v1/devices/brands/{}/series", uuid::Uuid::new_v4());
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.request(Method::GET, "/api/v1/devices/tree", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let response = app.request(Method::GET, "/api/v1/repair-types", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(6));

    let response = app
        .request(Method::GET, "/api/v1/blog?per_page=2", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));

    let response = app
        .request(Method::GET, "/api/v1/blog/water-damage-myths", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, "/api/v1/blog/choosing-refurbished-devices", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
