//! certbot webroot issuance.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::runner::{self, CommandError};
use super::service::CertificateIssuer;
use crate::domain::entities::CertificatePaths;
use crate::domain::errors::ProvisionError;

/// Runs `certbot certonly --webroot` for one domain at a time.
#[derive(Debug, Clone)]
pub struct CertbotIssuer {
    command: Vec<String>,
    webroot: PathBuf,
    live_dir: PathBuf,
    timeout: Duration,
}

impl CertbotIssuer {
    /// # Arguments
    ///
    /// - `command` - argv prefix for the tool, e.g. `["certbot"]`
    /// - `webroot` - directory served at `/.well-known/acme-challenge/`
    /// - `live_dir` - where the tool publishes certificates, e.g. `/etc/letsencrypt/live`
    /// - `timeout` - upper bound for one issuance
    pub fn new(
        command: Vec<String>,
        webroot: impl Into<PathBuf>,
        live_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            command,
            webroot: webroot.into(),
            live_dir: live_dir.into(),
            timeout,
        }
    }

    fn argv(&self, domain: &str, contact_email: &str) -> Vec<String> {
        let mut argv = self.command.clone();
        argv.extend(
            [
                "certonly",
                "--webroot",
                "-w",
                &self.webroot.display().to_string(),
                "-d",
                domain,
                "--preferred-challenges",
                "http",
                "--non-interactive",
                "--agree-tos",
                "-m",
                contact_email,
            ]
            .map(str::to_string),
        );
        argv
    }
}

#[async_trait]
impl CertificateIssuer for CertbotIssuer {
    async fn issue(
        &self,
        domain: &str,
        contact_email: &str,
    ) -> Result<CertificatePaths, ProvisionError> {
        tracing::info!(domain, "requesting certificate");

        let output = runner::run(&self.argv(domain, contact_email), self.timeout)
            .await
            .map_err(|e| match e {
                CommandError::TimedOut { command, timeout } => {
                    ProvisionError::ProcessTimeout { command, timeout }
                }
                other => ProvisionError::CertificateIssuanceFailed {
                    domain: domain.to_string(),
                    output: other.to_string(),
                },
            })?;

        if !output.success() {
            return Err(ProvisionError::CertificateIssuanceFailed {
                domain: domain.to_string(),
                output: output.describe(),
            });
        }

        tracing::info!(domain, "certificate issued");
        tracing::debug!(domain, output = %output.combined.trim(), "certbot output");

        Ok(CertificatePaths::live(&self.live_dir, domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_is_non_interactive_webroot() {
        let issuer = CertbotIssuer::new(
            vec!["certbot".to_string()],
            "/var/www/html",
            "/etc/letsencrypt/live",
            Duration::from_secs(300),
        );

        assert_eq!(
            issuer.argv("example.com", "admin@example.com").join(" "),
            "certbot certonly --webroot -w /var/www/html -d example.com \
             --preferred-challenges http --non-interactive --agree-tos -m admin@example.com"
        );
    }
}
