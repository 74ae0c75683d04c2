mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use edge_provisioner::routes::api_router;

#[tokio::test]
async fn test_health_endpoint_success() {
    let sandbox = common::Sandbox::new().with_listen("listen 80;\n");
    let state = sandbox.state(sandbox.server(), sandbox.issuer("exit 0"));
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["domains_dir"]["status"], "ok");
    assert_eq!(json["checks"]["listen_file"]["status"], "ok");
    assert_eq!(json["checks"]["listen_file"]["message"], "1 ports");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let sandbox = common::Sandbox::new();
    let state = sandbox.state(sandbox.server(), sandbox.issuer("exit 0"));
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();
    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("domains_dir").is_some());
    assert!(json["checks"].get("listen_file").is_some());
}

#[tokio::test]
async fn test_health_degraded_without_domains_dir() {
    let sandbox = common::Sandbox::new();
    std::fs::remove_dir(&sandbox.domains_dir).unwrap();
    let state = sandbox.state(sandbox.server(), sandbox.issuer("exit 0"));
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["domains_dir"]["status"], "error");
}
