//! External command execution.
//!
//! Binaries are resolved against `PATH` plus a few common user install
//! directories, then run with their output captured and a wall-clock limit.

use std::env;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The binary could not be located.
    #[error("Command not found: {0}")]
    NotFound(String),
    /// The process could not be started.
    #[error("Failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },
    /// The process did not finish in time and was killed.
    #[error("'{program}' timed out after {}ms", timeout.as_millis())]
    Timeout { program: String, timeout: Duration },
    /// The process exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed { program: String, status: String, stderr: String },
}

/// Captured result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Resolve the absolute path to an executable binary.
///
/// Absolute and relative paths containing a separator are checked as given.
/// Bare names are searched for in:
/// 1. Any directory listed in `CHUNKWALL_EXTRA_PATHS` (colon-separated).
/// 2. The current process `PATH`.
/// 3. `/usr/local/bin`, `/usr/bin`, `~/.cargo/bin` and `~/.local/bin`.
///
/// # Errors
///
/// Returns [`CommandError::NotFound`] when no executable file is found.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, CommandError> {
    if binary.is_empty() {
        return Err(CommandError::NotFound("<empty>".to_string()));
    }

    let candidate = Path::new(binary);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(CommandError::NotFound(binary.to_string()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var("CHUNKWALL_EXTRA_PATHS") {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    search_paths.extend([PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]);

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".cargo/bin"));
        search_paths.push(home.join(".local/bin"));
    }

    search_paths
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(|| CommandError::NotFound(binary.to_string()))
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Interval between exit checks while a command runs.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output is still collected after the process has exited.
///
/// A background job started by the command may hold the pipes open long
/// after the command itself is done.
const OUTPUT_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs `program` with `args` and waits up to `timeout` for it to exit.
///
/// Each pipe is drained on its own thread so a chatty child never blocks on
/// a full pipe. The timeout applies to the process, not to its pipes. On
/// timeout the child is killed.
///
/// # Errors
///
/// Returns an error if the binary is missing, cannot be started, exceeds the
/// timeout, or exits with a non-zero status.
pub fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CommandOutput, CommandError> {
    let binary = resolve_binary(program)?;

    let mut child = Command::new(&binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(program, &err))?;

    let (sender, receiver) = mpsc::channel();
    forward(child.stdout.take(), Stream::Stdout, sender.clone());
    forward(child.stderr.take(), Stream::Stderr, sender);

    let status = wait_for_exit(&mut child, program, timeout)?;
    let (stdout, stderr) = collect_output(&receiver);

    check_status(program, status, stdout, stderr)
}

/// Sends everything read from `pipe` to `sender` until EOF.
fn forward<R>(pipe: Option<R>, stream: Stream, sender: Sender<(Stream, Vec<u8>)>)
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = pipe else {
        return;
    };

    thread::spawn(move || {
        let mut buffer = [0u8; 8192];
        loop {
            match pipe.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if sender.send((stream, buffer[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
    });
}

fn wait_for_exit(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> Result<ExitStatus, CommandError> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait().map_err(|err| spawn_error(program, &err))? {
            return Ok(status);
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(program, timeout_ms = timeout.as_millis(), "command timed out");
            return Err(CommandError::Timeout { program: program.to_string(), timeout });
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Gathers what the readers forward until both pipes close or the grace
/// period runs out.
fn collect_output(receiver: &Receiver<(Stream, Vec<u8>)>) -> (String, String) {
    let deadline = Instant::now() + OUTPUT_GRACE;
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((Stream::Stdout, chunk)) => stdout.extend_from_slice(&chunk),
            Ok((Stream::Stderr, chunk)) => stderr.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("pipes still open after exit, keeping output read so far");
                break;
            }
        }
    }

    (String::from_utf8_lossy(&stdout).into_owned(), String::from_utf8_lossy(&stderr).into_owned())
}

fn spawn_error(program: &str, err: &std::io::Error) -> CommandError {
    CommandError::Spawn { program: program.to_string(), reason: err.to_string() }
}

fn check_status(
    program: &str,
    status: ExitStatus,
    stdout: String,
    stderr: String,
) -> Result<CommandOutput, CommandError> {
    if status.success() {
        Ok(CommandOutput { stdout, stderr })
    } else {
        Err(CommandError::Failed {
            program: program.to_string(),
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        })
    }
}
