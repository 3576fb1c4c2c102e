//! Error taxonomy for vault operations.
//!
//! Every printable message is already sanitized; raw diagnostics (exit code,
//! captured stdout/stderr) are carried separately for programmatic inspection.

use std::io;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

/// Diagnostics captured from a command that ran to completion and failed.
#[derive(Debug, Clone)]
pub struct ExecutionFailure {
    /// Sanitized, printable description of the failure.
    pub message: String,
    /// Exit code reported by the process; `None` when it died on a signal.
    pub exit_code: Option<i32>,
    /// Raw captured stdout. Not sanitized; do not display.
    pub stdout: String,
    /// Raw captured stderr. Not sanitized; do not display.
    pub stderr: String,
}

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("the ansible-vault command was not found; ensure Ansible is installed and the command is on your PATH")]
    ToolNotFound,

    #[error("invalid arguments: {0}")]
    InvalidArgument(&'static str),

    #[error("{context}: {source}")]
    Resource {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command timed out after {}s: {command}", .timeout.as_secs())]
    Timeout {
        /// Sanitized rendering of the command that was killed.
        command: String,
        timeout: Duration,
    },

    /// The tool rejected the invocation itself (exit code 2).
    #[error("{}", .0.message)]
    CliUsage(ExecutionFailure),

    /// The tool could not authenticate or decrypt (exit code 4).
    #[error("{}", .0.message)]
    Auth(ExecutionFailure),

    /// Any other non-zero exit.
    #[error("{}", .0.message)]
    Execution(ExecutionFailure),
}

impl VaultError {
    /// Exit-code diagnostics, when the failure came from a completed run.
    pub fn failure(&self) -> Option<&ExecutionFailure> {
        match self {
            VaultError::CliUsage(f) | VaultError::Auth(f) | VaultError::Execution(f) => Some(f),
            _ => None,
        }
    }

    /// Exit code of the failed run, when one exists.
    pub fn exit_code(&self) -> Option<i32> {
        self.failure().and_then(|f| f.exit_code)
    }
}
