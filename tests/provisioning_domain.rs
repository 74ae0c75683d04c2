mod common;

use edge_provisioner::domain::entities::CertificateState;
use edge_provisioner::domain::errors::{ErrorKind, Step};
use edge_provisioner::infrastructure::process::{CertbotIssuer, NginxControl};
use std::net::IpAddr;
use std::time::Duration;

/// Reload that fails once a proxy block is on disk.
fn reject_proxy_blocks(sandbox: &common::Sandbox) -> String {
    format!(
        "if grep -qs proxy_pass '{dir}'/*.conf; then echo 'upstream unreachable' >&2; exit 1; fi; echo reload >> '{log}'",
        dir = sandbox.domains_dir.display(),
        log = sandbox.reload_log.display(),
    )
}

#[tokio::test]
async fn test_add_domain_end_to_end() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    let record = service.add_domain("example.com", "10.0.0.5").await.unwrap();

    assert_eq!(record.name, "example.com");
    assert_eq!(record.target, "10.0.0.5".parse::<IpAddr>().unwrap());
    assert_eq!(record.certificate, CertificateState::Issued);
    assert_eq!(record.config_path, sandbox.domain_config("example.com"));

    let config = std::fs::read_to_string(sandbox.domain_config("example.com")).unwrap();
    assert!(config.contains("server_name example.com;"));
    assert!(config.contains("proxy_pass $scheme://10.0.0.5:$server_port;"));
    assert!(config.contains(&format!(
        "ssl_certificate {};",
        sandbox.live_dir.join("example.com/fullchain.pem").display()
    )));
    assert!(config.contains("/.well-known/acme-challenge/"));

    assert_eq!(sandbox.reload_count(), 2);
    assert!(service.domain_exists("example.com").await.unwrap());
}

#[tokio::test]
async fn test_bootstrap_block_is_live_during_issuance() {
    let sandbox = common::Sandbox::new();
    let snapshot = sandbox.dir.path().join("during-issue.conf");
    let issuer = sandbox.issuer(&format!(
        "cp '{}' '{}'",
        sandbox.domain_config("example.com").display(),
        snapshot.display()
    ));
    let service = sandbox.provisioning(sandbox.server(), issuer);

    service.add_domain("example.com", "10.0.0.5").await.unwrap();

    let bootstrap = std::fs::read_to_string(snapshot).unwrap();
    assert!(bootstrap.contains("server_name example.com;"));
    assert!(bootstrap.contains("/.well-known/acme-challenge/"));
    assert!(!bootstrap.contains("proxy_pass"));
    assert_eq!(sandbox.reload_count(), 2);
}

#[tokio::test]
async fn test_add_domain_ipv6_target() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    service.add_domain("v6.example.com", "2001:db8::1").await.unwrap();

    let config = std::fs::read_to_string(sandbox.domain_config("v6.example.com")).unwrap();
    assert!(config.contains("proxy_pass $scheme://[2001:db8::1]:$server_port;"));
}

#[tokio::test]
async fn test_add_domain_duplicate_leaves_file_untouched() {
    let sandbox = common::Sandbox::new();
    std::fs::write(sandbox.domain_config("example.com"), "# hand written\n").unwrap();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.step, Some(Step::CheckExisting));
    assert_eq!(
        std::fs::read_to_string(sandbox.domain_config("example.com")).unwrap(),
        "# hand written\n"
    );
    assert_eq!(sandbox.reload_count(), 0);
}

#[tokio::test]
async fn test_add_domain_rejects_bad_input_without_side_effects() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    for (domain, ip) in [
        ("not a domain", "10.0.0.5"),
        ("example.com", "999.1.1.1"),
        ("example.com", "backend.local"),
    ] {
        let err = service.add_domain(domain, ip).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{domain} {ip}");
        assert_eq!(err.step, Some(Step::Validate));
    }

    assert!(service.list_domains().await.unwrap().is_empty());
    assert_eq!(sandbox.reload_count(), 0);
}

#[tokio::test]
async fn test_add_domain_rejects_config_syntax_in_name() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    for domain in ["x.com; return 200 pwned", "x.com{", "x.com#comment", "a b.com"] {
        let err = service.add_domain(domain, "10.0.0.5").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{domain}");
        assert_eq!(err.step, Some(Step::Validate));
    }

    assert_eq!(std::fs::read_dir(&sandbox.domains_dir).unwrap().count(), 0);
    assert_eq!(sandbox.reload_count(), 0);
}

#[tokio::test]
async fn test_certificate_failure_rolls_back() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(
        sandbox.server(),
        sandbox.issuer("echo 'DNS problem: NXDOMAIN' >&2; exit 1"),
    );

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CertificateIssuanceFailed);
    assert_eq!(err.step, Some(Step::IssueCertificate));
    assert!(err.rollback.is_empty());
    assert!(err.to_string().contains("NXDOMAIN"));
    assert!(!sandbox.domain_config("example.com").exists());
    // bootstrap reload, then the rollback reload
    assert_eq!(sandbox.reload_count(), 2);
}

#[tokio::test]
async fn test_certificate_timeout_rolls_back() {
    let sandbox = common::Sandbox::new();
    let issuer = CertbotIssuer::new(
        common::sh_with_args("sleep 5"),
        &sandbox.webroot,
        &sandbox.live_dir,
        Duration::from_millis(200),
    );
    let service = sandbox.provisioning(sandbox.server(), issuer);

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProcessTimeout);
    assert_eq!(err.step, Some(Step::IssueCertificate));
    assert!(err.rollback.is_empty());
    assert_eq!(std::fs::read_dir(&sandbox.domains_dir).unwrap().count(), 0);
    // bootstrap reload, then the rollback reload
    assert_eq!(sandbox.reload_count(), 2);
}

#[tokio::test]
async fn test_final_reload_timeout_rolls_back() {
    let sandbox = common::Sandbox::new();
    let server = NginxControl::new(
        common::sh(&format!(
            "if grep -qs proxy_pass '{}'/*.conf; then sleep 5; fi",
            sandbox.domains_dir.display()
        )),
        common::sh_with_args("echo active"),
        "nginx",
        Duration::from_millis(500),
    );
    let service = sandbox.provisioning(server, sandbox.issuer("exit 0"));

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProcessTimeout);
    assert_eq!(err.step, Some(Step::ReloadProxy));
    assert!(err.rollback.is_empty());
    assert_eq!(std::fs::read_dir(&sandbox.domains_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_final_reload_failure_rolls_back() {
    let sandbox = common::Sandbox::new();
    let server = sandbox.server_with_reload(&reject_proxy_blocks(&sandbox));
    let service = sandbox.provisioning(server, sandbox.issuer("exit 0"));

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReloadFailed);
    assert_eq!(err.step, Some(Step::ReloadProxy));
    assert!(err.rollback.is_empty());
    assert!(!sandbox.domain_config("example.com").exists());
    assert_eq!(sandbox.reload_count(), 2);
}

#[tokio::test]
async fn test_rollback_failures_are_attached() {
    let sandbox = common::Sandbox::new();
    let server = sandbox.server_with_reload("echo 'nginx: [emerg] bad config' >&2; exit 1");
    let service = sandbox.provisioning(server, sandbox.issuer("exit 0"));

    let err = service.add_domain("example.com", "10.0.0.5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReloadFailed);
    assert_eq!(err.step, Some(Step::ReloadBootstrap));
    assert_eq!(err.rollback.len(), 1);
    assert!(!sandbox.domain_config("example.com").exists());
}

#[tokio::test]
async fn test_delete_domain() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));
    service.add_domain("example.com", "10.0.0.5").await.unwrap();

    service.delete_domain("example.com").await.unwrap();

    assert!(!sandbox.domain_config("example.com").exists());
    assert!(!service.domain_exists("example.com").await.unwrap());
    assert_eq!(sandbox.reload_count(), 3);
}

#[tokio::test]
async fn test_delete_missing_domain() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    let err = service.delete_domain("missing.com").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(sandbox.reload_count(), 0);
}

#[tokio::test]
async fn test_delete_domain_keeps_removal_when_reload_fails() {
    let sandbox = common::Sandbox::new();
    std::fs::write(sandbox.domain_config("example.com"), "server {}\n").unwrap();
    let service = sandbox.provisioning(
        sandbox.server_with_reload("exit 1"),
        sandbox.issuer("exit 0"),
    );

    let err = service.delete_domain("example.com").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReloadFailed);
    assert_eq!(err.step, Some(Step::Reload));
    assert!(!sandbox.domain_config("example.com").exists());
}

#[tokio::test]
async fn test_list_domains_sorted() {
    let sandbox = common::Sandbox::new();
    let service = sandbox.provisioning(sandbox.server(), sandbox.issuer("exit 0"));

    service.add_domain("b.example.com", "10.0.0.2").await.unwrap();
    service.add_domain("a.example.com", "10.0.0.1").await.unwrap();

    let domains: Vec<String> = service.list_domains().await.unwrap().into_iter().collect();
    assert_eq!(domains, vec!["a.example.com", "b.example.com"]);
}
