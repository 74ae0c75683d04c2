//! Per-domain server block templates.
//!
//! A domain's config file holds one of two variants:
//!
//! - **bootstrap** - placeholder certificate and only the ACME challenge
//!   location, live while the certificate is being issued
//! - **proxy** - the issued certificate and a catch-all location forwarding to
//!   the backend on the scheme and port the client connected on
//!
//! Templates live under `templates/nginx/` and are compiled in by askama.

use askama::Template;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::domain::entities::CertificatePaths;

/// Deployment paths interpolated into every server block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerBlockSettings {
    /// Shared listen file pulled into each block with `include`.
    pub listen_include: PathBuf,
    /// Directory the ACME client drops challenge tokens into.
    pub acme_webroot: PathBuf,
    /// Self-signed material used until the real certificate exists.
    pub bootstrap_certificate: CertificatePaths,
}

#[derive(Template)]
#[template(path = "nginx/bootstrap.conf", escape = "none")]
struct BootstrapBlock<'a> {
    server_name: &'a str,
    listen_include: String,
    certificate: String,
    certificate_key: String,
    acme_webroot: String,
}

#[derive(Template)]
#[template(path = "nginx/proxy.conf", escape = "none")]
struct ProxyBlock<'a> {
    server_name: &'a str,
    listen_include: String,
    certificate: String,
    certificate_key: String,
    acme_webroot: String,
    upstream: String,
}

impl ServerBlockSettings {
    pub fn render_bootstrap(&self, server_name: &str) -> askama::Result<String> {
        let block = BootstrapBlock {
            server_name,
            listen_include: self.listen_include.display().to_string(),
            certificate: self.bootstrap_certificate.certificate.display().to_string(),
            certificate_key: self.bootstrap_certificate.private_key.display().to_string(),
            acme_webroot: self.acme_webroot.display().to_string(),
        };
        block.render().map(terminate_line)
    }

    pub fn render_proxy(
        &self,
        server_name: &str,
        target: IpAddr,
        certificate: &CertificatePaths,
    ) -> askama::Result<String> {
        let block = ProxyBlock {
            server_name,
            listen_include: self.listen_include.display().to_string(),
            certificate: certificate.certificate.display().to_string(),
            certificate_key: certificate.private_key.display().to_string(),
            acme_webroot: self.acme_webroot.display().to_string(),
            upstream: upstream_host(target),
        };
        block.render().map(terminate_line)
    }
}

/// IPv6 literals need brackets before a `:port` suffix.
fn upstream_host(target: IpAddr) -> String {
    match target {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    }
}

fn terminate_line(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}
