use crate::ports::outbound::{CommandInvocation, CommandRunner, ProcessError};
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// TokioCommandRunner adapter for executing external programs
///
/// Spawns the program directly (no shell) with stdin on the null device
/// and both output streams piped, then races the exit against the
/// invocation's timeout and the caller's cancellation token.
///
/// Whatever happens to the call, the child does not outlive it: timeout
/// and cancellation kill and reap it before returning, and dropping the
/// call future kills it through [`ChildGuard`] and `kill_on_drop`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

enum Wait {
    Exited(io::Result<CollectedOutput>),
    TimedOut,
    Cancelled,
}

struct CollectedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Owns a running child and kills it if dropped before being reaped.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    async fn collect(&mut self) -> io::Result<CollectedOutput> {
        let stdout = self.child.stdout.take();
        let stderr = self.child.stderr.take();
        let (status, stdout, stderr) =
            tokio::join!(self.child.wait(), read_all(stdout), read_all(stderr));
        let status = status?;
        self.reaped = true;
        Ok(CollectedOutput {
            status,
            stdout: stdout?,
            stderr: stderr?,
        })
    }

    /// Kills the child and waits for it to be reaped.
    async fn terminate(&mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::debug!(error = %e, "failed to kill child process");
        }
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.start_kill();
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn spawn_error(program: &str, err: io::Error) -> ProcessError {
    match err.kind() {
        io::ErrorKind::NotFound => ProcessError::NotFound {
            program: program.to_string(),
        },
        _ => ProcessError::Unexpected {
            message: err.to_string(),
        },
    }
}

fn exit_failure(status: ExitStatus, stderr: &str) -> ProcessError {
    let trimmed = stderr.trim();
    let message = if !trimmed.is_empty() {
        trimmed.to_string()
    } else {
        match status.code() {
            Some(code) => format!("command exited with return code {}", code),
            None => describe_signal(status),
        }
    };
    ProcessError::CommandFailed {
        message,
        exit_code: status.code(),
    }
}

#[cfg(unix)]
fn describe_signal(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => format!("command terminated by signal {}", signal),
        None => "command failed without an exit code".to_string(),
    }
}

#[cfg(not(unix))]
fn describe_signal(_status: ExitStatus) -> String {
    "command failed without an exit code".to_string()
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        cancel: &CancellationToken,
    ) -> Result<String, ProcessError> {
        if cancel.is_cancelled() {
            return Err(ProcessError::Cancelled);
        }

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = invocation.working_dir() {
            // A missing cwd makes spawn fail with NotFound, which would be
            // misreported as a missing program.
            if !dir.is_dir() {
                return Err(ProcessError::Unexpected {
                    message: format!("working directory does not exist: {}", dir.display()),
                });
            }
            command.current_dir(dir);
        }

        tracing::debug!(
            program = invocation.program(),
            args = ?invocation.args(),
            timeout_secs = invocation.timeout().as_secs_f64(),
            "spawning command"
        );

        let child = command
            .spawn()
            .map_err(|e| spawn_error(invocation.program(), e))?;
        let mut guard = ChildGuard::new(child);

        let wait = tokio::select! {
            _ = cancel.cancelled() => Wait::Cancelled,
            result = guard.collect() => Wait::Exited(result),
            _ = tokio::time::sleep(invocation.timeout()) => Wait::TimedOut,
        };

        let output = match wait {
            Wait::Exited(result) => result.map_err(|e| ProcessError::Unexpected {
                message: e.to_string(),
            })?,
            Wait::TimedOut => {
                guard.terminate().await;
                tracing::warn!(
                    program = invocation.program(),
                    timeout_secs = invocation.timeout().as_secs_f64(),
                    "command timed out and was killed"
                );
                return Err(ProcessError::Timeout {
                    timeout: invocation.timeout(),
                });
            }
            Wait::Cancelled => {
                guard.terminate().await;
                tracing::debug!(program = invocation.program(), "command cancelled");
                return Err(ProcessError::Cancelled);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);

        tracing::debug!(
            program = invocation.program(),
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "command exited"
        );

        if output.status.success() {
            Ok(stdout)
        } else {
            Err(exit_failure(output.status, &stderr))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn sh(script: &str) -> CommandInvocation {
        CommandInvocation::new("sh", ["-c", script])
    }

    fn create_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    async fn read_pid(path: &Path) -> u32 {
        for _ in 0..100 {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(pid) = content.trim().parse() {
                    return pid;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("child never wrote its pid to {}", path.display());
    }

    /// True once the process is gone or only a zombie awaiting reaping.
    fn process_terminated(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/status", pid)) {
            Ok(status) => status
                .lines()
                .any(|line| line.starts_with("State:") && line.contains('Z')),
            Err(_) => true,
        }
    }

    async fn wait_terminated(pid: u32) -> bool {
        for _ in 0..100 {
            if process_terminated(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_success_returns_exact_stdout() {
        let runner = TokioCommandRunner::new();
        let output = runner
            .run(&sh("echo hello"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test]
    async fn test_script_file_with_arguments() {
        let tmp = TempDir::new().unwrap();
        let script = create_script(
            tmp.path(),
            "conan",
            "#!/bin/sh\nfor arg in \"$@\"; do echo \"[$arg]\"; done\n",
        );

        let invocation = CommandInvocation::new(
            script.to_string_lossy(),
            ["search", "zlib/*", "--format=json", "with space"],
        );
        let output = TokioCommandRunner::new()
            .run(&invocation, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            output,
            "[search]\n[zlib/*]\n[--format=json]\n[with space]\n"
        );
    }

    #[tokio::test]
    async fn test_failure_uses_trimmed_stderr() {
        let err = TokioCommandRunner::new()
            .run(
                &sh("echo '  ERROR: Recipe not found  ' >&2; exit 3"),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProcessError::CommandFailed {
                message: "ERROR: Recipe not found".to_string(),
                exit_code: Some(3),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_without_stderr_mentions_exit_code() {
        let err = TokioCommandRunner::new()
            .run(&sh("exit 2"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ProcessError::CommandFailed { message, exit_code } => {
                assert!(message.contains('2'), "message was {message}");
                assert_eq!(exit_code, Some(2));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signal_termination_is_reported() {
        let err = TokioCommandRunner::new()
            .run(&sh("kill -9 $$"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ProcessError::CommandFailed { message, exit_code } => {
                assert!(message.contains("signal 9"), "message was {message}");
                assert_eq!(exit_code, None);
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let tmp = TempDir::new().unwrap();
        let pid_file = tmp.path().join("pid");
        let invocation = sh(&format!("echo $$ > {}; exec sleep 30", pid_file.display()))
            .with_timeout(Duration::from_millis(300));

        let started = Instant::now();
        let err = TokioCommandRunner::new()
            .run(&invocation, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProcessError::Timeout {
                timeout: Duration::from_millis(300)
            }
        );
        assert!(started.elapsed() < Duration::from_secs(10));

        let pid = read_pid(&pid_file).await;
        assert!(wait_terminated(pid).await, "child {pid} still running");
    }

    #[tokio::test]
    async fn test_cancellation_kills_child() {
        let tmp = TempDir::new().unwrap();
        let pid_file = tmp.path().join("pid");
        let invocation = sh(&format!("echo $$ > {}; exec sleep 30", pid_file.display()));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let pid_path = pid_file.clone();
        tokio::spawn(async move {
            read_pid(&pid_path).await;
            trigger.cancel();
        });

        let err = TokioCommandRunner::new()
            .run(&invocation, &cancel)
            .await
            .unwrap_err();

        assert_eq!(err, ProcessError::Cancelled);
        let pid = read_pid(&pid_file).await;
        assert!(wait_terminated(pid).await, "child {pid} still running");
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_does_not_spawn() {
        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("ran");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = TokioCommandRunner::new()
            .run(&sh(&format!("touch {}", marker.display())), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err, ProcessError::Cancelled);
        assert!(!marker.exists());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_dropping_call_kills_child() {
        let tmp = TempDir::new().unwrap();
        let pid_file = tmp.path().join("pid");
        let invocation = sh(&format!("echo $$ > {}; exec sleep 30", pid_file.display()));

        let handle = tokio::spawn(async move {
            TokioCommandRunner::new()
                .run(&invocation, &CancellationToken::new())
                .await
        });

        let pid = read_pid(&pid_file).await;
        handle.abort();
        let _ = handle.await;

        assert!(wait_terminated(pid).await, "child {pid} still running");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let output = TokioCommandRunner::new()
            .run(&sh("printf 'ok\\377ok'"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "ok\u{FFFD}ok");
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let err = TokioCommandRunner::new()
            .run(
                &CommandInvocation::new("conan-mcp-no-such-program", ["--version"]),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProcessError::NotFound {
                program: "conan-mcp-no-such-program".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let tmp = TempDir::new().unwrap();
        let output = TokioCommandRunner::new()
            .run(&sh("pwd -P").in_dir(tmp.path()), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            PathBuf::from(output.trim()),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_unexpected() {
        let err = TokioCommandRunner::new()
            .run(
                &sh("true").in_dir("/nonexistent/conan-mcp/dir"),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Unexpected { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_invocations_are_independent() {
        let runner = TokioCommandRunner::new();
        let cancel = CancellationToken::new();
        let invocations: Vec<_> = (0..5)
            .map(|i| sh(&format!("sleep 0.1; echo {}", i)))
            .collect();

        let results = futures::future::join_all(
            invocations.iter().map(|invocation| runner.run(invocation, &cancel)),
        )
        .await;

        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), format!("{}\n", i));
        }
    }

    #[tokio::test]
    async fn test_large_output_is_fully_drained() {
        let output = TokioCommandRunner::new()
            .run(
                &sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done; echo done >&2"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(output.lines().count(), 20000);
        assert!(output.ends_with("line-19999\n"));
    }
}
