//! Child-process execution with captured output and wall-clock deadlines.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

use super::sanitize;
use crate::error::{Result, VaultError};

/// Grace period for collecting buffered output after the child exits.
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Capture stdout/stderr; stdin is fed from the request.
    #[default]
    Captured,
    /// Inherit the parent's terminal, as edit sessions need. Nothing is
    /// captured.
    Interactive,
}

/// One request to run the external tool. Immutable for the duration of the
/// call that owns it.
#[derive(Debug, Clone, Default)]
pub struct ExecRequest {
    /// Program plus arguments, in positional order.
    pub command: Vec<String>,
    /// Bytes written to the child's stdin, which is then closed. When absent
    /// the child sees an empty stdin. Captured mode only.
    pub stdin: Option<Vec<u8>>,
    /// Stream wiring for this run.
    pub mode: ExecMode,
    /// Wall-clock deadline; the child is killed when it elapses.
    pub timeout: Option<Duration>,
    /// Working directory (default: inherited from this process).
    pub cwd: Option<PathBuf>,
}

/// Captured results of a run that reached process exit.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

/// Execute the request and capture its outcome.
///
/// Launch failures (missing binary, permission denied) surface as
/// [`VaultError::Launch`]; an elapsed deadline kills the child and surfaces
/// as [`VaultError::Timeout`]. Exit-code interpretation is left to the
/// caller.
pub fn run(request: &ExecRequest) -> Result<ExecOutput> {
    if request.mode == ExecMode::Interactive {
        return run_interactive(request);
    }

    let mut child = spawn(request, Stdio::piped(), Stdio::piped())?;

    // Drain both pipes before waiting. Waiting first can deadlock: the child
    // blocks on write once the pipe buffer fills.
    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());

    if let Some(bytes) = request.stdin.clone() {
        if let Some(mut sink) = child.stdin.take() {
            thread::spawn(move || {
                // The child may exit without reading; a broken pipe is fine.
                let _ = sink.write_all(&bytes);
            });
        }
    }

    let status = match request.timeout {
        Some(timeout) => {
            match child.wait_timeout(timeout).map_err(wait_error)? {
                Some(status) => status,
                None => {
                    kill_and_reap(&mut child);
                    return Err(VaultError::Timeout {
                        command: sanitize::render(&request.command),
                        timeout,
                    });
                }
            }
        }
        None => child.wait().map_err(wait_error)?,
    };

    let stdout = collect(stdout_rx);
    let stderr = collect(stderr_rx);

    Ok(ExecOutput {
        stdout,
        stderr,
        code: status.code(),
    })
}

/// Interactive runs inherit stdin/stdout/stderr so the child can drive the
/// terminal; nothing is captured and no deadline applies — the session is
/// user-paced.
fn run_interactive(request: &ExecRequest) -> Result<ExecOutput> {
    let mut child = spawn(request, Stdio::inherit(), Stdio::inherit())?;
    let status = child.wait().map_err(wait_error)?;

    Ok(ExecOutput {
        stdout: String::new(),
        stderr: String::new(),
        code: status.code(),
    })
}

fn spawn(request: &ExecRequest, stdout: Stdio, stderr: Stdio) -> Result<Child> {
    let (program, args) = request
        .command
        .split_first()
        .ok_or(VaultError::InvalidArgument("command vector is empty"))?;

    let mut cmd = Command::new(program);
    cmd.args(args).stdout(stdout).stderr(stderr);

    match request.mode {
        ExecMode::Interactive => {
            cmd.stdin(Stdio::inherit());
        }
        ExecMode::Captured if request.stdin.is_some() => {
            cmd.stdin(Stdio::piped());
        }
        ExecMode::Captured => {
            cmd.stdin(Stdio::null());
        }
    }

    if let Some(dir) = &request.cwd {
        cmd.current_dir(dir);
    }

    cmd.spawn().map_err(|source| VaultError::Launch {
        program: program.clone(),
        source,
    })
}

/// Read a pipe to completion on a dedicated thread.
fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string())
}

fn kill_and_reap(child: &mut Child) {
    // The process may already have exited; ignore errors and reap the zombie.
    let _ = child.kill();
    let _ = child.wait();
}

fn wait_error(source: std::io::Error) -> VaultError {
    VaultError::Resource {
        context: "failed to wait for child process",
        source,
    }
}
