mod common;

use common::{sh, sh_with_args};
use edge_provisioner::domain::errors::ProvisionError;
use edge_provisioner::infrastructure::process::{
    CertbotIssuer, CertificateIssuer, NginxControl, ServerControl,
};
use std::time::Duration;

fn nginx(reload: &str, service: &str) -> NginxControl {
    NginxControl::new(
        sh(reload),
        sh_with_args(service),
        "nginx",
        Duration::from_secs(5),
    )
}

// ─── RELOAD ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reload_success() {
    let control = nginx("exit 0", "exit 0");

    assert!(control.reload().await.is_ok());
}

#[tokio::test]
async fn test_reload_failure_carries_output() {
    let control = nginx(
        "echo 'nginx: [emerg] unknown directive \"lisen\"' >&2; exit 1",
        "exit 0",
    );

    let err = control.reload().await.unwrap_err();

    let ProvisionError::ReloadFailed { output } = err else {
        panic!("expected ReloadFailed, got {err:?}");
    };
    assert!(output.contains("unknown directive"));
}

#[tokio::test]
async fn test_reload_missing_binary() {
    let control = NginxControl::new(
        vec!["/nonexistent/nginx".to_string()],
        vec!["true".to_string()],
        "nginx",
        Duration::from_secs(5),
    );

    let err = control.reload().await.unwrap_err();

    assert!(matches!(err, ProvisionError::ReloadFailed { .. }));
}

#[tokio::test]
async fn test_reload_timeout() {
    let control = NginxControl::new(
        sh("sleep 5"),
        vec!["true".to_string()],
        "nginx",
        Duration::from_millis(100),
    );

    let err = control.reload().await.unwrap_err();

    assert!(matches!(err, ProvisionError::ProcessTimeout { .. }));
}

// ─── SERVICE ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_service_receives_action_and_unit() {
    let control = nginx("exit 0", "[ \"$1\" = restart ] && [ \"$2\" = nginx ]");

    assert!(control.restart().await.is_ok());
    assert!(matches!(
        control.stop().await,
        Err(ProvisionError::ServiceControlFailed { .. })
    ));
}

#[tokio::test]
async fn test_service_failure_names_action() {
    let control = nginx("exit 0", "echo 'Unit nginx.service not found.' >&2; exit 5");

    let err = control.start().await.unwrap_err();

    let ProvisionError::ServiceControlFailed { action, output } = err else {
        panic!("expected ServiceControlFailed, got {err:?}");
    };
    assert_eq!(action, "start");
    assert!(output.contains("not found"));
}

#[tokio::test]
async fn test_status_reports_inactive_state() {
    let control = nginx("exit 0", "echo inactive; exit 3");

    assert_eq!(control.status().await.unwrap(), "inactive");
}

#[tokio::test]
async fn test_status_without_output_fails() {
    let control = nginx("exit 0", "exit 4");

    let err = control.status().await.unwrap_err();

    assert!(matches!(err, ProvisionError::ServiceControlFailed { .. }));
}

// ─── CERTIFICATES ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_issue_returns_live_paths() {
    let sandbox = common::Sandbox::new();
    let issuer = sandbox.issuer("exit 0");

    let paths = issuer.issue("example.com", "admin@example.com").await.unwrap();

    assert_eq!(
        paths.certificate,
        sandbox.live_dir.join("example.com/fullchain.pem")
    );
    assert_eq!(
        paths.private_key,
        sandbox.live_dir.join("example.com/privkey.pem")
    );
}

#[tokio::test]
async fn test_issue_passes_webroot_domain_and_contact() {
    let sandbox = common::Sandbox::new();
    let issuer = sandbox.issuer(&format!(
        "echo \"$@\" > '{}'",
        sandbox.dir.path().join("certbot-args").display()
    ));

    issuer.issue("example.com", "ops@example.org").await.unwrap();

    let args = std::fs::read_to_string(sandbox.dir.path().join("certbot-args")).unwrap();
    assert!(args.starts_with("certonly --webroot"));
    assert!(args.contains(&format!("-w {}", sandbox.webroot.display())));
    assert!(args.contains("-d example.com"));
    assert!(args.contains("--non-interactive --agree-tos"));
    assert!(args.contains("-m ops@example.org"));
}

#[tokio::test]
async fn test_issue_failure_carries_output() {
    let sandbox = common::Sandbox::new();
    let issuer = sandbox.issuer("echo 'too many certificates already issued' >&2; exit 1");

    let err = issuer.issue("example.com", "admin@example.com").await.unwrap_err();

    let ProvisionError::CertificateIssuanceFailed { domain, output } = err else {
        panic!("expected CertificateIssuanceFailed, got {err:?}");
    };
    assert_eq!(domain, "example.com");
    assert!(output.contains("too many certificates"));
}

#[tokio::test]
async fn test_issue_timeout() {
    let sandbox = common::Sandbox::new();
    let issuer = CertbotIssuer::new(
        sh_with_args("sleep 5"),
        &sandbox.webroot,
        &sandbox.live_dir,
        Duration::from_millis(100),
    );

    let err = issuer.issue("example.com", "admin@example.com").await.unwrap_err();

    assert!(matches!(err, ProvisionError::ProcessTimeout { .. }));
}
