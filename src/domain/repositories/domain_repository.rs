//! Repository trait for per-domain server block files.

use crate::domain::errors::ProvisionError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Storage of one server block file per domain.
///
/// The directory listing is the set of domains: a domain is present exactly
/// when its file exists. There is no separate index.
///
/// # Implementations
///
/// - [`crate::infrastructure::filesystem::FsDomainRepository`] - `<dir>/<domain>.conf` files
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Path of the file that backs `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::InvalidInput`] if `name` cannot be used as a
    /// file name inside the domains directory.
    fn config_path(&self, name: &str) -> Result<PathBuf, ProvisionError>;

    /// Returns whether a config file for `name` exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] if the file system cannot be queried.
    async fn exists(&self, name: &str) -> Result<bool, ProvisionError>;

    /// Creates or replaces the config file for `name`.
    ///
    /// A failed write never leaves a truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] on write or rename failure.
    async fn write(&self, name: &str, content: &str) -> Result<(), ProvisionError>;

    /// Reads the current config file for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::NotFound`] if the file is absent.
    /// Returns [`ProvisionError::Io`] on read failure.
    async fn read(&self, name: &str) -> Result<String, ProvisionError>;

    /// Deletes the config file for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::NotFound`] if the file is absent.
    /// Returns [`ProvisionError::Io`] on delete failure.
    async fn remove(&self, name: &str) -> Result<(), ProvisionError>;

    /// Lists provisioned domain names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] if the directory cannot be read.
    async fn list(&self) -> Result<BTreeSet<String>, ProvisionError>;
}
