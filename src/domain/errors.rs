//! Failure taxonomy shared by the provisioning engine, the stores and the
//! process gateway.
//!
//! [`ProvisionError`] is the primary cause of a failure. Multi-step operations
//! wrap it in an [`OperationError`] that also records which [`Step`] failed and
//! which compensating actions could not be completed.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Primary cause of a failed provisioning call.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Malformed domain, IP address or port.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    NotFound(String),

    /// File read, write, rename or delete failed.
    #[error("I/O failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-place reload command exited non-zero or could not be spawned.
    #[error("server reload failed: {output}")]
    ReloadFailed { output: String },

    #[error("certificate issuance for {domain} failed: {output}")]
    CertificateIssuanceFailed { domain: String, output: String },

    /// An external command ran past its time budget and was killed.
    #[error("`{command}` did not finish within {}s", .timeout.as_secs_f64())]
    ProcessTimeout { command: String, timeout: Duration },

    /// restart / start / stop / status failed.
    #[error("service `{action}` failed: {output}")]
    ServiceControlFailed { action: String, output: String },
}

impl ProvisionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::ReloadFailed { .. } => ErrorKind::ReloadFailed,
            Self::CertificateIssuanceFailed { .. } => ErrorKind::CertificateIssuanceFailed,
            Self::ProcessTimeout { .. } => ErrorKind::ProcessTimeout,
            Self::ServiceControlFailed { .. } => ErrorKind::ServiceControlFailed,
        }
    }
}

/// Flat discriminant of [`ProvisionError`], used for status mapping and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    AlreadyExists,
    NotFound,
    IoFailure,
    ReloadFailed,
    CertificateIssuanceFailed,
    ProcessTimeout,
    ServiceControlFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::IoFailure => "io_failure",
            Self::ReloadFailed => "reload_failed",
            Self::CertificateIssuanceFailed => "certificate_issuance_failed",
            Self::ProcessTimeout => "process_timeout",
            Self::ServiceControlFailed => "service_control_failed",
        }
    }

    /// Whether the caller rejected the request, as opposed to the host failing it.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::AlreadyExists | Self::NotFound
        )
    }

    /// Kinds for which re-running the whole operation may succeed.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::IoFailure
                | Self::ReloadFailed
                | Self::CertificateIssuanceFailed
                | Self::ProcessTimeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual steps of the provisioning operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Validate,
    CheckExisting,
    WriteBootstrap,
    ReloadBootstrap,
    IssueCertificate,
    WriteProxy,
    ReloadProxy,
    RemoveDomainConfig,
    AppendDirective,
    RemoveDirective,
    Reload,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validate => "validate input",
            Self::CheckExisting => "check existing configuration",
            Self::WriteBootstrap => "write bootstrap config",
            Self::ReloadBootstrap => "reload with bootstrap config",
            Self::IssueCertificate => "issue certificate",
            Self::WriteProxy => "write proxy config",
            Self::ReloadProxy => "reload with proxy config",
            Self::RemoveDomainConfig => "remove domain config",
            Self::AppendDirective => "append listen directive",
            Self::RemoveDirective => "remove listen directive",
            Self::Reload => "reload",
        };
        f.write_str(label)
    }
}

/// A failed operation: the primary cause plus supplementary rollback context.
///
/// The kind of an `OperationError` is always the kind of `cause`; failures of
/// compensating actions are collected in `rollback` and never replace it.
#[derive(Debug, Error)]
#[error("{cause}{}", rollback_suffix(.rollback))]
pub struct OperationError {
    pub step: Option<Step>,
    #[source]
    pub cause: ProvisionError,
    pub rollback: Vec<ProvisionError>,
}

impl OperationError {
    pub fn at(step: Step, cause: ProvisionError) -> Self {
        Self {
            step: Some(step),
            cause,
            rollback: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }

    /// Records a compensating action that failed while unwinding.
    pub fn push_rollback(&mut self, error: ProvisionError) {
        self.rollback.push(error);
    }
}

impl From<ProvisionError> for OperationError {
    fn from(cause: ProvisionError) -> Self {
        Self {
            step: None,
            cause,
            rollback: Vec::new(),
        }
    }
}

fn rollback_suffix(rollback: &[ProvisionError]) -> String {
    if rollback.is_empty() {
        return String::new();
    }
    let joined = rollback
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(" (rollback incomplete: {joined})")
}
