//! Integration tests for the catalog page and the middleware stack.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use loja_integration_tests::TestClient;

// =============================================================================
// Catalog page
// =============================================================================

#[tokio::test]
async fn test_home_defaults_to_first_category() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("VIP Bronze (30 dias)"));
    assert!(response.body.contains("R$ 14,90"));
    assert!(response.body.contains("Popular"));
    assert!(!response.body.contains("Handling Drift (RWD)"));
}

#[tokio::test]
async fn test_home_search_across_categories() {
    let mut client = TestClient::new();
    let response = client.get("/?q=turbo&category=all").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Blista Compact (motor AP turbo)"));
    assert!(!response.body.contains("VIP Bronze (30 dias)"));
    assert!(!response.body.contains("Nada encontrado"));
}

#[tokio::test]
async fn test_home_search_is_anded_with_category() {
    let mut client = TestClient::new();
    let response = client.get("/?q=turbo&category=vip").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Nada encontrado"));
    assert!(response.body.contains("Tente outra busca ou categoria."));
}

#[tokio::test]
async fn test_home_static_sections() {
    let mut client = TestClient::new();
    let body = client.get("/").await.body;

    assert!(body.contains("1) Monte seu carrinho"));
    assert!(body.contains("Como pago?"));
    assert!(body.contains("https://discord.gg/teste"));
    assert!(body.contains("Seu carrinho está vazio."));
}

#[tokio::test]
async fn test_add_buttons_return_to_current_filter() {
    let mut client = TestClient::new();
    let body = client.get("/?q=som&category=veiculos").await.body;
    assert!(body.contains("value=\"/?q=som&amp;category=veiculos\""));
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_security_headers_and_nonce() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));

    let csp = response.header("content-security-policy").unwrap();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();
    assert!(response.body.contains(&format!("nonce=\"{nonce}\"")));
}

#[tokio::test]
async fn test_request_id_is_generated_or_echoed() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    let generated = response.header("x-request-id").unwrap();
    assert_eq!(generated.len(), 36);

    let response = client
        .get_with_header("/health", "x-request-id", "cf-ray-1234")
        .await;
    assert_eq!(response.header("x-request-id"), Some("cf-ray-1234"));
}

#[tokio::test]
async fn test_static_css_is_served() {
    let mut client = TestClient::new();
    let response = client.get("/static/css/main.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("--accent: #ffa500"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut client = TestClient::new();
    let response = client.get("/checkout").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
