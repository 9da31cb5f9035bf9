use axum::http::{self, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use mock_server::{app, Shipment, API_KEY, LABEL_PDF};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn auth_header() -> String {
    format!("basic {}", STANDARD.encode(API_KEY))
}

fn create_request(content_type: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/shipments")
        .header(http::header::CONTENT_TYPE, content_type)
        .header(http::header::AUTHORIZATION, auth_header())
        .body(body.to_string())
        .unwrap()
}

fn authed(method: &str, uri: &str, accept: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::ACCEPT, accept)
        .header(http::header::AUTHORIZATION, auth_header())
        .body(String::new())
        .unwrap()
}

const SHIPMENT_JSON: &str = "application/vnd.shipment+json; charset=utf-8";
const ONE_SHIPMENT: &str =
    r#"{"data":{"shipments":[{"reference_identifier":"order-1","carrier":1,"recipient":{"cc":"NL","city":"Hoofddorp"}}]}}"#;

// --- auth ---

#[tokio::test]
async fn missing_authorization_returns_401_with_errors() {
    let resp = app()
        .oneshot(Request::builder().uri("/shipments/1").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], 3000);
    assert_eq!(body["message"], "Access Denied");
}

// --- create ---

#[tokio::test]
async fn create_shipment_returns_ids() {
    let resp = app().oneshot(create_request(SHIPMENT_JSON, ONE_SHIPMENT)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["ids"][0]["id"], 1);
    assert_eq!(body["data"]["ids"][0]["reference_identifier"], "order-1");
}

#[tokio::test]
async fn create_return_shipment_uses_return_collection() {
    let resp = app()
        .oneshot(create_request(
            "application/vnd.return_shipment+json; charset=utf-8",
            r#"{"data":{"return_shipments":[{"parent":1,"recipient":{"cc":"NL"}}]}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["ids"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_without_recipient_returns_nested_validation_error() {
    let resp = app()
        .oneshot(create_request(SHIPMENT_JSON, r#"{"data":{"shipments":[{"carrier":1}]}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0][0]["fields"][0], "data.shipments[0].recipient");
    assert_eq!(body["message"], "Validation failed");
}

#[tokio::test]
async fn create_with_malformed_json_returns_400() {
    let resp = app().oneshot(create_request(SHIPMENT_JSON, "{not json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], 3505);
}

#[tokio::test]
async fn create_with_plain_json_content_type_returns_415() {
    let resp = app()
        .oneshot(create_request("application/json", ONE_SHIPMENT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- retrieve ---

#[tokio::test]
async fn get_unknown_shipment_returns_404() {
    let resp = app()
        .oneshot(authed("GET", "/shipments/42", "application/json; charset=utf-8"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["human"][0], "No shipment with id 42");
}

#[tokio::test]
async fn get_non_numeric_id_returns_404() {
    let resp = app()
        .oneshot(authed("GET", "/shipments/abc", "application/json; charset=utf-8"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn shipment_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(create_request(SHIPMENT_JSON, ONE_SHIPMENT))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    let id = created["data"]["ids"][0]["id"].as_u64().unwrap();

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/shipments/{id}"), "application/json; charset=utf-8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = body_json(resp).await;
    let shipment: Shipment = serde_json::from_value(fetched["data"]["shipments"][0].clone()).unwrap();
    assert_eq!(shipment.id, id);
    assert_eq!(shipment.reference_identifier.as_deref(), Some("order-1"));
    assert!(!shipment.is_return);

    // label as pdf
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/shipment_labels/{id}"), "application/pdf; charset=utf-8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/pdf");
    assert_eq!(body_bytes(resp).await, LABEL_PDF);

    // label as link
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/shipment_labels/{id}"), "application/json; charset=utf-8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let link: Value = body_json(resp).await;
    let url = link["data"]["pdfs"]["url"].as_str().unwrap();
    assert!(url.starts_with("/pdfs/") && url.ends_with(".pdf"), "{url}");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("DELETE", &format!("/shipments/{id}"), "application/json; charset=utf-8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/shipments/{id}"), "application/json; charset=utf-8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
