//! Error types for the scheduler client

use thiserror::Error;

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Exit code the scheduler uses for "no such job / target".
pub const NOT_FOUND_EXIT_CODE: i32 = 255;

/// Errors that can occur when talking to the batch scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler refused the submission or acknowledged it in an
    /// unexpected way
    #[error(
        "submission rejected (exit code {exit_code}): `{command}`{}",
        render_output(.stdout, .stderr)
    )]
    SubmissionRejected {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The scheduler exited with its "unknown job/target" sentinel
    #[error("scheduler target not found: `{command}`{}", render_output(.stdout, .stderr))]
    JobNotFound {
        command: String,
        stdout: String,
        stderr: String,
    },

    /// A kill command was refused
    #[error(
        "kill rejected (exit code {exit_code}): `{command}`{}",
        render_output(.stdout, .stderr)
    )]
    KillRejected {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The job listing command failed
    #[error("job listing failed (exit code {exit_code}): `{command}`{}", render_output("", .stderr))]
    ListingFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The command could not be started at all
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl SchedulerError {
    /// The literal command line that failed
    pub fn command(&self) -> &str {
        match self {
            Self::SubmissionRejected { command, .. }
            | Self::JobNotFound { command, .. }
            | Self::KillRejected { command, .. }
            | Self::ListingFailed { command, .. }
            | Self::Spawn { command, .. } => command,
        }
    }

    /// Check if this error is the scheduler's "not found" sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::JobNotFound { .. })
    }

    /// Check if a caller may reasonably retry the operation.
    ///
    /// Only the not-found sentinel qualifies: it is commonly a transient race
    /// against queue or job-group creation on the scheduler side.
    pub fn is_retryable(&self) -> bool {
        self.is_not_found()
    }
}

fn render_output(stdout: &str, stderr: &str) -> String {
    let mut rendered = String::new();
    if !stdout.trim().is_empty() {
        rendered.push_str(&format!("\nstdout: {}", stdout.trim()));
    }
    if !stderr.trim().is_empty() {
        rendered.push_str(&format!("\nstderr: {}", stderr.trim()));
    }
    rendered
}
