//! Integration tests for `POST /certificates`.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The issuer running (cargo run -p ignite-certificates-issuer)
//! - A Chromium binary and bucket credentials available to the issuer
//!
//! Run with: cargo test -p ignite-certificates-integration-tests -- --ignored

use ignite_certificates_integration_tests::{issuer_base_url, unique_id};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn post_certificate(client: &Client, body: &Value) -> reqwest::Response {
    client
        .post(format!("{}/certificates", issuer_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to send request")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running issuer"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", issuer_base_url()))
        .send()
        .await
        .expect("Failed to reach issuer");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running issuer and database"]
async fn test_readiness() {
    let resp = Client::new()
        .get(format!("{}/health/ready", issuer_base_url()))
        .send()
        .await
        .expect("Failed to reach issuer");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Issuing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running issuer, database, browser and bucket"]
async fn test_issue_returns_public_url() {
    let client = Client::new();
    let id = unique_id("it");

    let resp = post_certificate(&client, &json!({"id": id, "name": "Ana", "grade": "A"})).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Certificate created!");

    let url = body["url"].as_str().expect("url should be a string");
    assert!(url.ends_with(&format!("/{id}.pdf")));
}

#[tokio::test]
#[ignore = "Requires running issuer, database, browser and bucket"]
async fn test_reissue_returns_same_url() {
    let client = Client::new();
    let id = unique_id("it");

    let first = post_certificate(&client, &json!({"id": id, "name": "Ana", "grade": "A"})).await;
    let second = post_certificate(&client, &json!({"id": id, "name": "Ana", "grade": "B"})).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CREATED);

    let first: Value = first.json().await.expect("Failed to parse response");
    let second: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(first["url"], second["url"]);
}

#[tokio::test]
#[ignore = "Requires running issuer, database, browser and bucket"]
async fn test_published_pdf_is_downloadable() {
    let client = Client::new();
    let id = unique_id("it");

    let resp = post_certificate(&client, &json!({"id": id, "name": "Ana", "grade": "A"})).await;
    let body: Value = resp.json().await.expect("Failed to parse response");
    let url = body["url"].as_str().expect("url should be a string");

    let pdf = client.get(url).send().await.expect("Failed to fetch PDF");
    assert_eq!(pdf.status(), StatusCode::OK);
    assert_eq!(
        pdf.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let bytes = pdf.bytes().await.expect("Failed to read PDF");
    assert!(bytes.starts_with(b"%PDF"));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running issuer"]
async fn test_missing_grade_is_rejected() {
    let resp = post_certificate(
        &Client::new(),
        &json!({"id": unique_id("it"), "name": "Ana"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("grade")));
}

#[tokio::test]
#[ignore = "Requires running issuer"]
async fn test_path_like_id_is_rejected() {
    let resp = post_certificate(
        &Client::new(),
        &json!({"id": "../escape", "name": "Ana", "grade": "A"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
