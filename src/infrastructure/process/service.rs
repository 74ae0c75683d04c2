//! Contracts for the external server and certificate tooling.

use async_trait::async_trait;

use crate::domain::entities::CertificatePaths;
use crate::domain::errors::ProvisionError;

/// Control over the running web server and its service unit.
///
/// Implementations never touch configuration files; they only make the live
/// server pick up what is already on disk.
///
/// # Implementations
///
/// - [`crate::infrastructure::process::NginxControl`] - `nginx -s reload` and `systemctl`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerControl: Send + Sync {
    /// Applies on-disk configuration in place. Safe to call with no changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::ReloadFailed`] with the command output, or
    /// [`ProvisionError::ProcessTimeout`].
    async fn reload(&self) -> Result<(), ProvisionError>;

    /// # Errors
    ///
    /// Returns [`ProvisionError::ServiceControlFailed`] or
    /// [`ProvisionError::ProcessTimeout`].
    async fn restart(&self) -> Result<(), ProvisionError>;

    /// # Errors
    ///
    /// Same as [`ServerControl::restart`].
    async fn start(&self) -> Result<(), ProvisionError>;

    /// # Errors
    ///
    /// Same as [`ServerControl::restart`].
    async fn stop(&self) -> Result<(), ProvisionError>;

    /// Raw state string reported by the service manager (`active`, `inactive`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::ServiceControlFailed`] when no state could be read.
    async fn status(&self) -> Result<String, ProvisionError>;
}

/// Issues certificates through an ACME webroot challenge.
///
/// The challenge token is served by the server itself, so the domain's
/// bootstrap block must be live before [`CertificateIssuer::issue`] is called.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Obtains a certificate for a single domain, non-interactively.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::CertificateIssuanceFailed`] with the tool's
    /// output, or [`ProvisionError::ProcessTimeout`].
    async fn issue(
        &self,
        domain: &str,
        contact_email: &str,
    ) -> Result<CertificatePaths, ProvisionError>;
}
