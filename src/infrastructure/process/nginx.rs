//! nginx reload and service-manager control.

use async_trait::async_trait;
use std::time::Duration;

use super::runner::{self, CommandError, CommandOutput};
use super::service::ServerControl;
use crate::domain::errors::ProvisionError;

/// Drives nginx through its reload signal and the service manager.
#[derive(Debug, Clone)]
pub struct NginxControl {
    reload_command: Vec<String>,
    service_ctl: Vec<String>,
    service_name: String,
    timeout: Duration,
}

impl NginxControl {
    /// # Arguments
    ///
    /// - `reload_command` - full argv, e.g. `["nginx", "-s", "reload"]`
    /// - `service_ctl` - argv prefix taking `<action> <service>`, e.g. `["systemctl"]`
    /// - `service_name` - unit name, e.g. `nginx`
    /// - `timeout` - upper bound for every call
    pub fn new(
        reload_command: Vec<String>,
        service_ctl: Vec<String>,
        service_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            reload_command,
            service_ctl,
            service_name: service_name.into(),
            timeout,
        }
    }

    async fn service(&self, action: &str) -> Result<CommandOutput, ProvisionError> {
        let mut argv = self.service_ctl.clone();
        argv.push(action.to_string());
        argv.push(self.service_name.clone());

        runner::run(&argv, self.timeout)
            .await
            .map_err(|e| match e {
                CommandError::TimedOut { command, timeout } => {
                    ProvisionError::ProcessTimeout { command, timeout }
                }
                other => ProvisionError::ServiceControlFailed {
                    action: action.to_string(),
                    output: other.to_string(),
                },
            })
    }

    async fn service_checked(&self, action: &str) -> Result<(), ProvisionError> {
        let output = self.service(action).await?;
        if !output.success() {
            return Err(ProvisionError::ServiceControlFailed {
                action: action.to_string(),
                output: output.describe(),
            });
        }
        tracing::info!(action, service = %self.service_name, "service command succeeded");
        Ok(())
    }
}

#[async_trait]
impl ServerControl for NginxControl {
    async fn reload(&self) -> Result<(), ProvisionError> {
        let output = runner::run(&self.reload_command, self.timeout)
            .await
            .map_err(|e| match e {
                CommandError::TimedOut { command, timeout } => {
                    ProvisionError::ProcessTimeout { command, timeout }
                }
                other => ProvisionError::ReloadFailed {
                    output: other.to_string(),
                },
            })?;

        if !output.success() {
            return Err(ProvisionError::ReloadFailed {
                output: output.describe(),
            });
        }

        tracing::debug!("server reloaded");
        Ok(())
    }

    async fn restart(&self) -> Result<(), ProvisionError> {
        self.service_checked("restart").await
    }

    async fn start(&self) -> Result<(), ProvisionError> {
        self.service_checked("start").await
    }

    async fn stop(&self) -> Result<(), ProvisionError> {
        self.service_checked("stop").await
    }

    async fn status(&self) -> Result<String, ProvisionError> {
        let output = self.service("is-active").await?;

        // is-active exits non-zero for inactive and failed units but still
        // prints the state.
        let state = output.stdout.trim();
        if !state.is_empty() {
            return Ok(state.to_string());
        }

        Err(ProvisionError::ServiceControlFailed {
            action: "is-active".to_string(),
            output: output.describe(),
        })
    }
}
