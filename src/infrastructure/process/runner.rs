//! Bounded execution of external commands.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Result of a command that ran to completion.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    /// stdout followed by stderr.
    pub combined: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Combined output with surrounding whitespace trimmed, or the exit status
    /// when the command printed nothing.
    pub fn describe(&self) -> String {
        let trimmed = self.combined.trim();
        if trimmed.is_empty() {
            self.status.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command line")]
    Empty,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

/// Runs `argv` to completion or until `timeout` elapses.
///
/// stdin is closed. On timeout the child is killed.
///
/// # Errors
///
/// Returns [`CommandError::Empty`] for an empty `argv`,
/// [`CommandError::Spawn`] if the program cannot be started, and
/// [`CommandError::TimedOut`] if it outlives `timeout`.
pub async fn run(argv: &[String], timeout: Duration) -> Result<CommandOutput, CommandError> {
    let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;
    let command = argv.join(" ");

    tracing::debug!(command = %command, "running external command");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => return Err(CommandError::Spawn { command, source }),
        Err(_) => {
            tracing::warn!(command = %command, ?timeout, "external command timed out");
            return Err(CommandError::TimedOut { command, timeout });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut combined = stdout.clone();
    combined.push_str(&stderr);

    tracing::debug!(command = %command, status = %output.status, "external command finished");

    Ok(CommandOutput {
        status: output.status,
        stdout,
        combined,
    })
}

/// Splits a command line from configuration into argv on whitespace.
pub fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
