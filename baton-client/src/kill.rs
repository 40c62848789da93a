//! Administrative job termination (`bkill`)

use baton_core::{JobId, KillOptions};

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{NOT_FOUND_EXIT_CODE, Result, SchedulerError};
use crate::flags::{Flag, render_flags, shell_quote};
use crate::lsf::LsfClient;

const TERMINATED_MARKER: &str = "is being terminated";

impl<R: CommandRunner> LsfClient<R> {
    /// Builds the kill command lines for `targets`.
    ///
    /// Numeric ids are killed with one batched command. `bkill` cannot kill
    /// several jobs by name at once, so a single non-numeric target switches
    /// to one `-J` command per target.
    pub(crate) fn kill_commands(targets: &[String], options: &KillOptions) -> Vec<String> {
        if targets.is_empty() {
            return Vec::new();
        }

        let flags = render_flags(&kill_flags(options));
        let all_numeric = targets
            .iter()
            .all(|target| JobId::from(target.as_str()).is_numeric());

        if all_numeric {
            vec![format!("bkill{} {}", flags, targets.join(" "))]
        } else {
            targets
                .iter()
                .map(|name| format!("bkill{} -J {}", flags, shell_quote(name)))
                .collect()
        }
    }

    pub(crate) fn check_kill(command_line: &str, output: CommandOutput) -> Result<()> {
        if output.exit_code == NOT_FOUND_EXIT_CODE {
            return Err(SchedulerError::JobNotFound {
                command: command_line.to_string(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        if !output.success() || !output.stdout.contains(TERMINATED_MARKER) {
            return Err(SchedulerError::KillRejected {
                command: command_line.to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(())
    }
}

fn kill_flags(options: &KillOptions) -> Vec<Flag> {
    let mut flags = Vec::new();
    if let Some(user) = &options.user {
        flags.push(Flag::text("u", user.as_str()));
    }
    if let Some(queue) = &options.queue {
        flags.push(Flag::text("q", queue.as_str()));
    }
    flags
}
