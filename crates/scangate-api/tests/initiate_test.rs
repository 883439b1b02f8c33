//! Initiate API integration tests.
//!
//! Run with: `cargo test -p scangate-api --test initiate_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::json;

fn v1_body() -> serde_json::Value {
    json!({
        "callbackUrl": "https://my.callback.url",
        "minimumFileSize": 0,
        "maximumFileSize": 1024,
        "expectedMimeType": "application/pdf"
    })
}

#[tokio::test]
async fn v1_initiate_returns_reference_and_signed_template() {
    let app = setup_test_app().await;

    let response = app.client().post("/v1/initiate").json(&v1_body()).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();

    let reference = body["reference"].as_str().expect("reference");
    assert!(!reference.is_empty());

    let upload_request = &body["uploadRequest"];
    assert_eq!(
        upload_request["href"].as_str(),
        Some("http://localhost:3000/upload")
    );

    let fields = &upload_request["fields"];
    assert_eq!(fields["key"].as_str(), Some(reference));
    assert_eq!(fields["acl"].as_str(), Some("private"));
    assert_eq!(fields["X-Amz-Algorithm"].as_str(), Some("AWS4-HMAC-SHA256"));
    assert_eq!(
        fields["x-amz-meta-callback-url"].as_str(),
        Some("https://my.callback.url")
    );
    assert!(fields["policy"].as_str().is_some_and(|p| !p.is_empty()));
    assert!(fields["X-Amz-Signature"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn v2_initiate_with_redirects_keeps_the_v1_contract() {
    let app = setup_test_app().await;

    let mut body = v1_body();
    body["successRedirect"] = json!("https://example.com/ok");
    body["errorRedirect"] = json!("https://example.com/fail");

    let response = app.client().post("/v2/initiate").json(&body).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let reference = body["reference"].as_str().expect("reference");
    assert_eq!(body["uploadRequest"]["fields"]["key"].as_str(), Some(reference));
    assert_eq!(
        body["uploadRequest"]["href"].as_str(),
        Some("http://localhost:3000/upload")
    );
}

#[tokio::test]
async fn http_callback_url_is_rejected_with_protocol_error() {
    let app = setup_test_app().await;

    let mut body = v1_body();
    body["callbackUrl"] = json!("http://my.callback.url");

    for path in ["/v1/initiate", "/v2/initiate"] {
        let response = app.client().post(path).json(&body).await;
        assert_eq!(response.status_code(), 400, "path {}", path);
        assert!(
            response.text().contains("Invalid callback url protocol"),
            "path {}",
            path
        );
    }
}

#[tokio::test]
async fn unparseable_callback_url_is_rejected_with_format_error() {
    let app = setup_test_app().await;

    let mut body = v1_body();
    body["callbackUrl"] = json!("123");

    let response = app.client().post("/v1/initiate").json(&body).await;
    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("Invalid callback url format"));
}

#[tokio::test]
async fn non_json_body_is_unsupported_media_type() {
    let app = setup_test_app().await;

    let response = app.client().post("/v1/initiate").text("not json").await;
    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn missing_required_key_is_bad_request() {
    let app = setup_test_app().await;

    let mut body = v1_body();
    body.as_object_mut()
        .expect("object body")
        .remove("maximumFileSize");

    let response = app.client().post("/v1/initiate").json(&body).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn inverted_size_bounds_are_rejected() {
    let app = setup_test_app().await;

    let mut body = v1_body();
    body["minimumFileSize"] = json!(2048);

    let response = app.client().post("/v1/initiate").json(&body).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/v1/initiate")
        .add_header("X-Request-ID", "trace-me-123")
        .json(&v1_body())
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("X-Request-ID").map(|h| h.to_str().ok()),
        Some(Some("trace-me-123"))
    );
}
