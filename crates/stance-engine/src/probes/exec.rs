//! External tool execution with a hard per-invocation time budget.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::ProbeError;

/// Invocation recipe for one external tool.
///
/// Arguments are fixed and non-interactive; nothing user-controlled is
/// ever spliced into them.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Program name or path, resolved through `PATH` as usual.
    pub program: String,
    /// Argument list passed verbatim.
    pub args: Vec<String>,
    /// Ceiling on one invocation; overruns are treated as tool failures.
    pub timeout: Duration,
}

impl ToolCommand {
    /// Build a recipe from a program name and fixed arguments.
    pub fn new(program: impl Into<String>, args: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(ToString::to_string).collect(),
            timeout,
        }
    }
}

/// Run the tool to completion and return its stdout.
///
/// Distinguishes an absent binary ([`ProbeError::ToolMissing`]) from every
/// in-execution failure, because callers take different recovery paths for
/// the two. The child is killed if the timeout fires or the calling future
/// is dropped, so a wedged tool cannot outlive its invocation.
///
/// # Errors
///
/// Returns a [`ProbeError`] describing the failure mode: missing binary,
/// spawn failure, non-zero exit, undecodable stdout, or timeout.
pub(crate) async fn run_tool(cmd: &ToolCommand) -> Result<String, ProbeError> {
    debug!(tool = %cmd.program, timeout = ?cmd.timeout, "running external tool");

    let invocation = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(cmd.timeout, invocation).await {
        Err(_) => {
            return Err(ProbeError::Timeout {
                tool: cmd.program.clone(),
                timeout: cmd.timeout,
            })
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProbeError::ToolMissing {
                tool: cmd.program.clone(),
            })
        }
        Ok(Err(e)) => {
            return Err(ProbeError::Spawn {
                tool: cmd.program.clone(),
                source: e,
            })
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit {
            tool: cmd.program.clone(),
            status: output.status,
        });
    }

    String::from_utf8(output.stdout).map_err(|_| ProbeError::Output {
        tool: cmd.program.clone(),
        reason: "stdout is not valid UTF-8".to_string(),
    })
}


#[cfg(all(test, unix))]
mod unix_tests {
    use std::os::unix::fs::PermissionsExt;

    use tempfile::TempDir;

    use super::*;

    /// Drop an executable shell script into `dir` and return its path.
    fn stub_tool(dir: &TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn successful_run_returns_stdout() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "speaker", "echo hello");
        let cmd = ToolCommand::new(tool, &[], Duration::from_secs(5));
        assert_eq!(run_tool(&cmd).await.unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_not_missing() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "grumpy", "echo nope >&2\nexit 3");
        let cmd = ToolCommand::new(tool, &[], Duration::from_secs(5));
        let err = run_tool(&cmd).await.unwrap_err();
        assert!(matches!(err, ProbeError::NonZeroExit { .. }), "got {err}");
        assert!(!err.is_tool_missing());
    }

    #[tokio::test]
    async fn overrunning_tool_times_out() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "sleeper", "sleep 30");
        let cmd = ToolCommand::new(tool, &[], Duration::from_millis(200));
        let err = run_tool(&cmd).await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }), "got {err}");
    }

    #[tokio::test]
    async fn arguments_are_passed_through() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "echoer", "echo \"$@\"");
        let cmd = ToolCommand::new(tool, &["--json", "one two"], Duration::from_secs(5));
        assert_eq!(run_tool(&cmd).await.unwrap(), "--json one two\n");
    }
}
