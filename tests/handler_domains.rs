mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use edge_provisioner::routes::api_router;
use serde_json::json;

fn make_server(sandbox: &common::Sandbox, certbot: &str) -> TestServer {
    let state = sandbox.state(sandbox.server(), sandbox.issuer(certbot));
    TestServer::new(api_router(state)).unwrap()
}

fn bearer() -> String {
    format!("Bearer {}", common::TEST_API_KEY)
}

// ─── ADD ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_domain_success() {
    let sandbox = common::Sandbox::new();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .post("/add-domain")
        .add_header("Authorization", bearer())
        .json(&json!({"domain": "example.com", "ip": "10.0.0.5"}))
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "Domain example.com added and routed to 10.0.0.5");
    assert!(sandbox.domain_config("example.com").is_file());
}

#[tokio::test]
async fn test_add_domain_invalid_ip() {
    let sandbox = common::Sandbox::new();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .post("/add-domain")
        .add_header("Authorization", bearer())
        .json(&json!({"domain": "example.com", "ip": "300.0.0.1"}))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["message"], "Invalid IP format");
    assert_eq!(body["error"]["details"]["step"], "validate");
}

#[tokio::test]
async fn test_add_domain_missing_field() {
    let sandbox = common::Sandbox::new();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .post("/add-domain")
        .add_header("Authorization", bearer())
        .json(&json!({"domain": "example.com"}))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_input"
    );
}

#[tokio::test]
async fn test_add_domain_certificate_failure() {
    let sandbox = common::Sandbox::new();
    let server = make_server(&sandbox, "echo 'Timeout during connect' >&2; exit 1");

    let response = server
        .post("/add-domain")
        .add_header("Authorization", bearer())
        .json(&json!({"domain": "example.com", "ip": "10.0.0.5"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "certificate_issuance_failed");
    assert_eq!(body["error"]["details"]["step"], "issue_certificate");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Timeout during connect")
    );
    assert!(!sandbox.domain_config("example.com").exists());
}

// ─── DELETE / LIST ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_domain() {
    let sandbox = common::Sandbox::new();
    std::fs::write(sandbox.domain_config("example.com"), "server {}\n").unwrap();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .delete("/delete-domain/example.com")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    assert!(!sandbox.domain_config("example.com").exists());
}

#[tokio::test]
async fn test_delete_missing_domain() {
    let sandbox = common::Sandbox::new();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .delete("/delete-domain/missing.com")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_list_domains() {
    let sandbox = common::Sandbox::new();
    std::fs::write(sandbox.domain_config("b.example.com"), "server {}\n").unwrap();
    std::fs::write(sandbox.domain_config("a.example.com"), "server {}\n").unwrap();
    let server = make_server(&sandbox, "exit 0");

    let response = server
        .get("/domains")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["domains"], json!(["a.example.com", "b.example.com"]));
}
