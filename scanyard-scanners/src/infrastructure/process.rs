//! Shared helpers for running external tools

use std::io;
use std::process::{Output, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Outcome of a spawn attempt that distinguishes a missing executable.
#[derive(Debug)]
pub enum SpawnFailure {
    NotFound,
    Io(io::Error),
}

impl From<io::Error> for SpawnFailure {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Run `cmd` to completion, capturing stdout and stderr.
///
/// When `stdin` is given it is written to the child and the pipe closed, so
/// secrets can be handed over without appearing on the command line.
pub async fn run(cmd: &mut Command, stdin: Option<&[u8]>) -> Result<Output, SpawnFailure> {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;

    if let Some(input) = stdin
        && let Some(mut pipe) = child.stdin.take()
    {
        pipe.write_all(input).await?;
        pipe.shutdown().await?;
        drop(pipe);
    }

    Ok(child.wait_with_output().await?)
}

/// Lossy UTF-8 rendering of captured stderr, trimmed for log and error text.
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Lossy UTF-8 rendering of captured stdout, trimmed.
pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Query `<executable> --version`, returning the first line of output.
pub async fn tool_version(executable: &str) -> Result<String, SpawnFailure> {
    let output = run(Command::new(executable).arg("--version"), None).await?;

    if !output.status.success() {
        return Err(SpawnFailure::Io(io::Error::other(stderr_text(&output))));
    }

    Ok(stdout_text(&output)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string())
}
