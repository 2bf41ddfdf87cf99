mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

const LG_URL: &str = "https://www.lg.com/us/tvs/oled55c3";

async fn call(router: Router, method: &str, uri: &str) -> (StatusCode, Option<String>, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, content_type, json)
}

fn lg_router(release_date: &str, price: &str) -> Router {
    pricewatch_api::router(common::service(
        common::lg_page(release_date, price),
        LG_URL,
        false,
    ))
}

#[tokio::test]
async fn get_returns_depreciated_device() {
    common::init_test_tracing();
    let (status, content_type, body) =
        call(lg_router("01-01-2021", "1000.00"), "GET", "/device").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["brand"], "LG");
    assert_eq!(body["model"], "OLED55C3");
    assert_eq!(body["release_date"], "01-01-2021");
    let price = body["price"].as_f64().unwrap();
    assert!((price - 900.0).abs() < 1e-9, "price was {price}");
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn status_param_is_uppercased() {
    let (status, _, body) = call(
        lg_router("01-01-2021", "1000.00"),
        "GET",
        "/device?status=available",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "AVAILABLE");
}

#[tokio::test]
async fn empty_status_param_is_ignored() {
    let (_, _, body) =
        call(lg_router("01-01-2021", "1000.00"), "GET", "/device?status=").await;
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn post_is_method_not_allowed() {
    let (status, content_type, body) =
        call(lg_router("01-01-2021", "1000.00"), "POST", "/device").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, json!({ "message": "Method not allowed" }));
}

#[tokio::test]
async fn other_methods_are_rejected_too() {
    for method in ["PUT", "DELETE", "PATCH"] {
        let (status, _, body) = call(lg_router("01-01-2021", "1000.00"), method, "/device").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body["message"], "Method not allowed");
    }
}

#[tokio::test]
async fn head_is_rejected_without_fetching() {
    let page = Arc::new(common::CountingPage::new(common::lg_page("01-01-2021", "1000.00")));
    let router = pricewatch_api::router(common::service_with_source(page.clone(), LG_URL));

    let (status, _, _) = call(router, "HEAD", "/device").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(page.fetches(), 0);
}

#[tokio::test]
async fn unsupported_retailer_is_device_information_error() {
    common::init_test_tracing();
    let router = pricewatch_api::router(common::service(
        common::lg_page("01-01-2021", "1000.00"),
        "https://www.example.com",
        false,
    ));
    let (status, _, body) = call(router, "GET", "/device").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error getting device information" }));
}

#[tokio::test]
async fn unparseable_price_is_device_information_error() {
    let (status, _, body) = call(lg_router("01-01-2021", "call us"), "GET", "/device").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error getting device information" }));
}

#[tokio::test]
async fn bad_release_date_is_device_age_error() {
    for date in ["2021", "01-01-twenty"] {
        let (status, _, body) = call(lg_router(date, "1000.00"), "GET", "/device").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{date}");
        assert_eq!(body, json!({ "message": "Error getting device age" }));
    }
}

#[tokio::test]
async fn old_devices_go_negative_unless_floored() {
    let (_, _, body) = call(lg_router("01-01-1990", "1000.00"), "GET", "/device").await;
    let price = body["price"].as_f64().unwrap();
    assert!((price - (-650.0)).abs() < 1e-9, "price was {price}");

    let floored = pricewatch_api::router(common::service(
        common::lg_page("01-01-1990", "1000.00"),
        LG_URL,
        true,
    ));
    let (_, _, body) = call(floored, "GET", "/device").await;
    assert_eq!(body["price"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, _, _) = call(lg_router("01-01-2021", "1000.00"), "GET", "/devices").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
