//! Command-execution boundary
//!
//! The only place in Baton that starts external processes. Everything the
//! scheduler client does goes through a [`CommandRunner`] so that tests can
//! script the scheduler's responses.

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of one command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a shell command line to completion, capturing stdout, stderr and
/// the exit code.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command_line` and waits for it to exit.
    ///
    /// A non-zero exit is not an error at this level; only failing to start
    /// the process is.
    async fn run(&self, command_line: &str) -> std::io::Result<CommandOutput>;
}

/// Runs command lines through `sh -c`
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command_line: &str) -> std::io::Result<CommandOutput> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .output()
            .await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            // Killed by a signal: no exit code
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_runner_captures_streams_and_exit_code() {
        let output = ShellRunner::new()
            .run("echo accepted; echo warning >&2; exit 3")
            .await
            .unwrap();

        assert_eq!(output.stdout, "accepted");
        assert_eq!(output.stderr, "warning");
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_shell_runner_supports_pipes() {
        let output = ShellRunner::new().run("echo 'a b' | wc -w").await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "2");
    }
}
