//! Repository trait for the shared listen file.

use crate::domain::entities::ListenPort;
use crate::domain::errors::ProvisionError;
use async_trait::async_trait;

/// Storage of `listen <port>;` directives inside one shared file.
///
/// A port is present exactly when its directive line is in the file. Lines
/// that are not exact directives belong to the deployment and are preserved.
///
/// # Implementations
///
/// - [`crate::infrastructure::filesystem::FsPortRepository`] - file-backed
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortRepository: Send + Sync {
    /// Returns whether the exact directive for `port` is present.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] if the file exists but cannot be read.
    async fn is_listed(&self, port: ListenPort) -> Result<bool, ProvisionError>;

    /// Appends the directive for `port`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] on read or write failure.
    async fn append(&self, port: ListenPort) -> Result<(), ProvisionError>;

    /// Removes every directive for `port` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::NotFound`] if no directive for `port` exists.
    /// Returns [`ProvisionError::Io`] on read or write failure.
    async fn remove(&self, port: ListenPort) -> Result<usize, ProvisionError>;

    /// Lists managed ports in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] if the file exists but cannot be read.
    async fn list(&self) -> Result<Vec<ListenPort>, ProvisionError>;
}
