//! Execution facade for the external vault tool.
//!
//! Composes the process runner and the command sanitizer: runs a command
//! vector, returns raw stdout on success, and on a non-zero exit raises a
//! classified error whose printable message has every secret masked.

pub mod runner;
pub mod sanitize;

use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{ExecutionFailure, Result, VaultError};
use runner::{ExecMode, ExecOutput, ExecRequest};

/// Default wall-clock limit for captured runs.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Exit code the tool reports for malformed invocations.
const EXIT_CLI_USAGE: i32 = 2;
/// Exit code the tool reports for failed authentication or decryption.
const EXIT_AUTH_FAILURE: i32 = 4;

/// Per-call overrides for [`CommandExecutor::execute_with`].
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Payload written to the child's stdin.
    pub stdin: Option<Vec<u8>>,
    /// Run attached to the terminal instead of capturing output.
    pub interactive: bool,
    /// Overrides the executor's default deadline for this call.
    pub timeout: Option<Duration>,
    /// Overrides the executor's working directory for this call.
    pub cwd: Option<PathBuf>,
}

/// Runs command vectors and classifies non-zero exits.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    default_timeout: Duration,
    cwd: Option<PathBuf>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            cwd: None,
        }
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor whose captured runs are bounded by `timeout` instead of
    /// the 60-second default.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            default_timeout: timeout,
            cwd: None,
        }
    }

    /// Working directory applied to every run (default: inherited).
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Run a command and return its raw stdout on exit code 0.
    ///
    /// Output is returned untrimmed; whitespace handling belongs to callers.
    pub fn execute(&self, command: &[String]) -> Result<String> {
        self.execute_with(command, ExecOptions::default())
    }

    pub fn execute_with(&self, command: &[String], options: ExecOptions) -> Result<String> {
        let mode = if options.interactive {
            ExecMode::Interactive
        } else {
            ExecMode::Captured
        };
        let request = ExecRequest {
            command: command.to_vec(),
            stdin: options.stdin,
            mode,
            // Interactive sessions are user-paced; only captured runs get a
            // deadline.
            timeout: match mode {
                ExecMode::Interactive => None,
                ExecMode::Captured => Some(options.timeout.unwrap_or(self.default_timeout)),
            },
            cwd: options.cwd.or_else(|| self.cwd.clone()),
        };

        debug!("running {}", sanitize::render(command));
        let output = runner::run(&request)?;

        if output.code == Some(0) {
            return Ok(output.stdout);
        }

        Err(classify(command, output))
    }
}

/// Map a completed, failed run onto the error taxonomy.
///
/// The message is built from the sanitized rendering; the raw exit code,
/// stdout and stderr ride along untouched for programmatic inspection.
fn classify(command: &[String], output: ExecOutput) -> VaultError {
    let rendered = sanitize::render(command);
    let mut message = match output.code {
        Some(code) => format!("Command failed with exit code {code}: {rendered}"),
        None => format!("Command terminated by signal: {rendered}"),
    };

    let trimmed_stderr = output.stderr.trim();
    if !trimmed_stderr.is_empty() {
        message.push('\n');
        message.push_str(trimmed_stderr);
    }

    let failure = ExecutionFailure {
        message,
        exit_code: output.code,
        stdout: output.stdout,
        stderr: output.stderr,
    };

    match failure.exit_code {
        Some(EXIT_CLI_USAGE) => VaultError::CliUsage(failure),
        Some(EXIT_AUTH_FAILURE) => VaultError::Auth(failure),
        _ => VaultError::Execution(failure),
    }
}
