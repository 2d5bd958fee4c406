//! Thin wrapper around external process execution.
//!
//! Commands are always spawned with an explicit argument list; nothing is
//! interpreted by a shell.

use camino::Utf8Path;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded and trimmed.
    pub stderr: String,
}

/// Runs `program` with `args`, optionally inside `cwd`, and captures output.
///
/// # Errors
///
/// Returns the spawn error when the program cannot be started. A non-zero
/// exit status is reported through [`CommandOutput::success`], not as an
/// error.
pub async fn run(program: &str, args: &[&str], cwd: Option<&Utf8Path>) -> io::Result<CommandOutput> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    debug!(command = %render(program, args), "spawning process");
    let output = command.output().await?;
    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
    })
}

/// Renders a command line for diagnostics.
#[must_use]
pub fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
