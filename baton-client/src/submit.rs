//! Job submission (`bsub`)

use baton_core::{JobId, SchedulerParams};

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{NOT_FOUND_EXIT_CODE, Result, SchedulerError};
use crate::flags::{Flag, render_flags, shell_quote};
use crate::lsf::LsfClient;

/// Marker present in `bsub`'s acknowledgment, e.g.
/// `Job <12345> is submitted to queue <short>.`
const SUBMITTED_MARKER: &str = "is submitted";

impl<R: CommandRunner> LsfClient<R> {
    /// Builds the full submission command line.
    ///
    /// The job's command is piped to `bsub` on stdin so that it reaches the
    /// execution host unmodified. `printf '%s'` is used because `echo`
    /// expands backslash escapes in some shells.
    pub(crate) fn submit_command(command: &str, job_name: &str, params: &SchedulerParams) -> String {
        let rendered_name = params.render_job_name(job_name);
        format!(
            "printf '%s\\n' {} | bsub{}",
            shell_quote(command),
            render_flags(&submit_flags(&rendered_name, params))
        )
    }

    /// Classifies the scheduler's response to a submission.
    pub(crate) fn parse_submission(command_line: &str, output: CommandOutput) -> Result<JobId> {
        if output.exit_code == NOT_FOUND_EXIT_CODE {
            return Err(SchedulerError::JobNotFound {
                command: command_line.to_string(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let job_id = if output.success() && output.stdout.contains(SUBMITTED_MARKER) {
            extract_bracketed(&output.stdout).map(JobId::from)
        } else {
            None
        };

        job_id.ok_or_else(|| SchedulerError::SubmissionRejected {
            command: command_line.to_string(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

fn submit_flags(job_name: &str, params: &SchedulerParams) -> Vec<Flag> {
    let mut flags = vec![
        Flag::text("q", params.queue.as_str()),
        Flag::number("M", params.memory_mb),
    ];

    if params.overwrite_logs {
        flags.push(Flag::text("oo", params.output_log_path.as_str()));
    } else {
        flags.push(Flag::text("o", params.output_log_path.as_str()));
    }

    if let Some(error_log) = &params.error_log_path {
        let name = if params.overwrite_logs { "eo" } else { "e" };
        flags.push(Flag::text(name, error_log.as_str()));
    }

    if let Some(email) = &params.notify_email {
        flags.push(Flag::text("u", email.as_str()));
        flags.push(Flag::switch("N"));
    }

    if let Some(resources) = &params.resource_request {
        flags.push(Flag::text("R", resources.as_str()));
    }

    flags.push(Flag::text("J", job_name));
    flags
}

/// Returns the first `<...>` token of `text`, if non-empty.
fn extract_bracketed(text: &str) -> Option<&str> {
    let start = text.find('<')? + 1;
    let end = start + text[start..].find('>')?;
    let token = text[start..end].trim();
    (!token.is_empty()).then_some(token)
}
