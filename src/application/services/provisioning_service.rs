//! Domain and port provisioning against the live web server.

use metrics::counter;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{CertificateState, DomainRecord, ListenPort};
use crate::domain::errors::{OperationError, ProvisionError, Step};
use crate::domain::repositories::{DomainRepository, PortRepository};
use crate::domain::server_block::ServerBlockSettings;
use crate::infrastructure::process::{CertificateIssuer, ServerControl};
use crate::utils::validation::{is_valid_domain, parse_ip};

/// Orchestrates the configuration store, the server and the certificate
/// tool into all-or-nothing provisioning operations.
///
/// A successful mutating call leaves the files on disk and the live server in
/// agreement. A failed call removes whatever it wrote before returning, then
/// issues a best-effort reload; failures of those compensating actions are
/// attached to the returned [`OperationError`] without changing its kind.
///
/// Mutating operations are serialised by one lock owned by the service and
/// held across their external-process calls. Queries do not take the lock.
pub struct ProvisioningService {
    domains: Arc<dyn DomainRepository>,
    ports: Arc<dyn PortRepository>,
    server: Arc<dyn ServerControl>,
    issuer: Arc<dyn CertificateIssuer>,
    blocks: ServerBlockSettings,
    contact_email: Option<String>,
    lock: Mutex<()>,
}

impl ProvisioningService {
    /// Creates a provisioning service.
    ///
    /// Certificate requests use `admin@<domain>` as the ACME contact until
    /// [`Self::with_contact_email`] sets a fixed address.
    pub fn new(
        domains: Arc<dyn DomainRepository>,
        ports: Arc<dyn PortRepository>,
        server: Arc<dyn ServerControl>,
        issuer: Arc<dyn CertificateIssuer>,
        blocks: ServerBlockSettings,
    ) -> Self {
        Self {
            domains,
            ports,
            server,
            issuer,
            blocks,
            contact_email: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_contact_email(mut self, contact_email: Option<String>) -> Self {
        self.contact_email = contact_email;
        self
    }

    /// Provisions `name` as a TLS reverse proxy to `target`.
    ///
    /// # Steps
    ///
    /// 1. Validate the domain and the IP literal
    /// 2. Refuse if a config file already exists
    /// 3. Write the bootstrap block (placeholder certificate, challenge location)
    /// 4. Reload so the challenge location is served
    /// 5. Issue the certificate through the webroot challenge
    /// 6. Overwrite the file with the proxy block
    /// 7. Reload
    ///
    /// Any failure after step 3 removes the file and reloads again.
    ///
    /// # Errors
    ///
    /// The error's [`OperationError::step`] names the step that failed:
    ///
    /// - `InvalidInput` from [`Step::Validate`]
    /// - `AlreadyExists` from [`Step::CheckExisting`], with the file untouched
    /// - `ReloadFailed` / `ProcessTimeout` from either reload step
    /// - `CertificateIssuanceFailed` / `ProcessTimeout` from [`Step::IssueCertificate`]
    /// - `IoFailure` from the store
    pub async fn add_domain(
        &self,
        name: &str,
        target: &str,
    ) -> Result<DomainRecord, OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.add_domain_locked(name, target).await;
        record("add_domain", &result);
        result
    }

    async fn add_domain_locked(
        &self,
        name: &str,
        target: &str,
    ) -> Result<DomainRecord, OperationError> {
        let target = validate_domain_target(name, target)?;
        let config_path = self
            .domains
            .config_path(name)
            .map_err(|e| OperationError::at(Step::Validate, e))?;

        if self
            .domains
            .exists(name)
            .await
            .map_err(|e| OperationError::at(Step::CheckExisting, e))?
        {
            return Err(OperationError::at(
                Step::CheckExisting,
                ProvisionError::AlreadyExists(format!("Domain {name}")),
            ));
        }

        let bootstrap = self
            .blocks
            .render_bootstrap(name)
            .map_err(|e| OperationError::at(Step::WriteBootstrap, render_error(&config_path, e)))?;
        self.domains
            .write(name, &bootstrap)
            .await
            .map_err(|e| OperationError::at(Step::WriteBootstrap, e))?;
        tracing::info!(domain = name, path = %config_path.display(), "bootstrap config written");

        if let Err(e) = self.server.reload().await {
            return Err(self.discard_domain(name, Step::ReloadBootstrap, e).await);
        }

        let contact_email = self.contact_email_for(name);
        let certificate = match self.issuer.issue(name, &contact_email).await {
            Ok(certificate) => certificate,
            Err(e) => return Err(self.discard_domain(name, Step::IssueCertificate, e).await),
        };

        let proxy = match self.blocks.render_proxy(name, target, &certificate) {
            Ok(proxy) => proxy,
            Err(e) => {
                let cause = render_error(&config_path, e);
                return Err(self.discard_domain(name, Step::WriteProxy, cause).await);
            }
        };
        if let Err(e) = self.domains.write(name, &proxy).await {
            return Err(self.discard_domain(name, Step::WriteProxy, e).await);
        }

        if let Err(e) = self.server.reload().await {
            return Err(self.discard_domain(name, Step::ReloadProxy, e).await);
        }

        Ok(DomainRecord::new(
            name.to_string(),
            target,
            CertificateState::Issued,
            config_path,
        ))
    }

    /// Removes the config file for `name`, then reloads.
    ///
    /// A reload failure after removal is reported but the file is not
    /// restored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed name, `NotFound` if the domain
    /// is not provisioned, `IoFailure` or `ReloadFailed` otherwise.
    pub async fn delete_domain(&self, name: &str) -> Result<(), OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.delete_domain_locked(name).await;
        record("delete_domain", &result);
        result
    }

    async fn delete_domain_locked(&self, name: &str) -> Result<(), OperationError> {
        if !is_valid_domain(name) {
            return Err(OperationError::at(
                Step::Validate,
                ProvisionError::invalid("Invalid domain format"),
            ));
        }

        if !self
            .domains
            .exists(name)
            .await
            .map_err(|e| OperationError::at(Step::CheckExisting, e))?
        {
            return Err(OperationError::at(
                Step::CheckExisting,
                ProvisionError::NotFound(format!("Domain {name}")),
            ));
        }

        self.domains
            .remove(name)
            .await
            .map_err(|e| OperationError::at(Step::RemoveDomainConfig, e))?;
        tracing::info!(domain = name, "domain config removed");

        self.server
            .reload()
            .await
            .map_err(|e| OperationError::at(Step::Reload, e))
    }

    /// Adds a `listen <port>;` directive, then reloads.
    ///
    /// Leading zeros are accepted and dropped, so `"0443"` manages `listen 443;`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless `port` is a decimal integer in
    /// `1..=65535`, `AlreadyExists` if the directive is present, and
    /// `ReloadFailed` after removing the directive again if the reload fails.
    pub async fn add_port(&self, port: &str) -> Result<ListenPort, OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.add_port_locked(port).await;
        record("add_port", &result);
        result
    }

    async fn add_port_locked(&self, port: &str) -> Result<ListenPort, OperationError> {
        let port: ListenPort = port
            .parse()
            .map_err(|e| OperationError::at(Step::Validate, e))?;

        if self
            .ports
            .is_listed(port)
            .await
            .map_err(|e| OperationError::at(Step::CheckExisting, e))?
        {
            return Err(OperationError::at(
                Step::CheckExisting,
                ProvisionError::AlreadyExists(format!("Port {port}")),
            ));
        }

        self.ports
            .append(port)
            .await
            .map_err(|e| OperationError::at(Step::AppendDirective, e))?;
        tracing::info!(%port, "listen directive appended");

        if let Err(e) = self.server.reload().await {
            tracing::warn!(%port, error = %e, "reload failed, removing listen directive");
            let mut error = OperationError::at(Step::Reload, e);
            if let Err(e) = self.ports.remove(port).await {
                error.push_rollback(e);
            }
            if let Err(e) = self.server.reload().await {
                error.push_rollback(e);
            }
            return Err(error);
        }

        Ok(port)
    }

    /// Removes every `listen <port>;` directive for `port`, then reloads.
    ///
    /// A reload failure after removal is reported but the directive is not
    /// restored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed port, `NotFound` if no exact
    /// directive exists, `IoFailure` or `ReloadFailed` otherwise.
    pub async fn delete_port(&self, port: &str) -> Result<ListenPort, OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.delete_port_locked(port).await;
        record("delete_port", &result);
        result
    }

    async fn delete_port_locked(&self, port: &str) -> Result<ListenPort, OperationError> {
        let port: ListenPort = port
            .parse()
            .map_err(|e| OperationError::at(Step::Validate, e))?;

        if !self
            .ports
            .is_listed(port)
            .await
            .map_err(|e| OperationError::at(Step::CheckExisting, e))?
        {
            return Err(OperationError::at(
                Step::CheckExisting,
                ProvisionError::NotFound(format!("Port {port}")),
            ));
        }

        let removed = self
            .ports
            .remove(port)
            .await
            .map_err(|e| OperationError::at(Step::RemoveDirective, e))?;
        tracing::info!(%port, removed, "listen directives removed");

        self.server
            .reload()
            .await
            .map_err(|e| OperationError::at(Step::Reload, e))?;

        Ok(port)
    }

    /// Reloads the server with whatever is on disk.
    pub async fn reload(&self) -> Result<(), OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.server.reload().await.map_err(OperationError::from);
        record("reload", &result);
        result
    }

    pub async fn restart(&self) -> Result<(), OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.server.restart().await.map_err(OperationError::from);
        record("restart", &result);
        result
    }

    pub async fn start(&self) -> Result<(), OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.server.start().await.map_err(OperationError::from);
        record("start", &result);
        result
    }

    pub async fn stop(&self) -> Result<(), OperationError> {
        let _guard = self.lock.lock().await;
        let result = self.server.stop().await.map_err(OperationError::from);
        record("stop", &result);
        result
    }

    /// Service state as reported by the service manager, e.g. `active`.
    pub async fn status(&self) -> Result<String, OperationError> {
        self.server.status().await.map_err(OperationError::from)
    }

    pub async fn list_domains(&self) -> Result<BTreeSet<String>, ProvisionError> {
        self.domains.list().await
    }

    pub async fn list_ports(&self) -> Result<Vec<ListenPort>, ProvisionError> {
        self.ports.list().await
    }

    pub async fn domain_exists(&self, name: &str) -> Result<bool, ProvisionError> {
        self.domains.exists(name).await
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed port.
    pub async fn port_listed(&self, port: &str) -> Result<bool, ProvisionError> {
        let port: ListenPort = port.parse()?;
        self.ports.is_listed(port).await
    }

    fn contact_email_for(&self, name: &str) -> String {
        self.contact_email
            .clone()
            .unwrap_or_else(|| format!("admin@{name}"))
    }

    /// Removes the just-written config for `name` and reloads, collecting
    /// failures of both into the returned error.
    async fn discard_domain(&self, name: &str, step: Step, cause: ProvisionError) -> OperationError {
        tracing::warn!(domain = name, %step, error = %cause, "rolling back domain config");

        let mut error = OperationError::at(step, cause);
        if let Err(e) = self.domains.remove(name).await {
            error.push_rollback(e);
        }
        if let Err(e) = self.server.reload().await {
            error.push_rollback(e);
        }
        if !error.rollback.is_empty() {
            tracing::error!(domain = name, failures = error.rollback.len(), "rollback incomplete");
        }
        error
    }
}

fn validate_domain_target(name: &str, target: &str) -> Result<IpAddr, OperationError> {
    if !is_valid_domain(name) {
        return Err(OperationError::at(
            Step::Validate,
            ProvisionError::invalid("Invalid domain format"),
        ));
    }
    parse_ip(target).ok_or_else(|| {
        OperationError::at(Step::Validate, ProvisionError::invalid("Invalid IP format"))
    })
}

fn render_error(path: &Path, error: askama::Error) -> ProvisionError {
    ProvisionError::io(path, std::io::Error::other(error))
}

/// Logs the outcome and bumps `edge_provisioner_operations_total`.
///
/// The counter goes to whatever global `metrics` recorder the embedding
/// process installs; without one it is a no-op.
fn record<T>(operation: &'static str, result: &Result<T, OperationError>) {
    match result {
        Ok(_) => {
            tracing::info!(operation, "operation succeeded");
            counter!(
                "edge_provisioner_operations_total",
                "operation" => operation,
                "outcome" => "ok"
            )
            .increment(1);
        }
        Err(e) => {
            tracing::warn!(
                operation,
                kind = %e.kind(),
                step = ?e.step,
                error = %e,
                "operation failed"
            );
            counter!(
                "edge_provisioner_operations_total",
                "operation" => operation,
                "outcome" => e.kind().as_str()
            )
            .increment(1);
        }
    }
}
