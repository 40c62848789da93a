//! LSF scheduler client

use async_trait::async_trait;
use baton_core::{JobId, KillOptions, SchedulerParams};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::SchedulerClient;
use crate::command::{CommandOutput, CommandRunner, ShellRunner};
use crate::error::{Result, SchedulerError};

/// Scheduler client driving the LSF command-line tools
#[derive(Debug, Clone)]
pub struct LsfClient<R = ShellRunner> {
    runner: R,
}

impl LsfClient<ShellRunner> {
    /// Creates a client that runs commands through `sh -c`
    pub fn new() -> Self {
        Self::with_runner(ShellRunner::new())
    }
}

impl Default for LsfClient<ShellRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> LsfClient<R> {
    /// Creates a client with a custom command runner
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Logs and runs one command line.
    pub(crate) async fn execute(&self, command: &str) -> Result<CommandOutput> {
        info!("LSF exec: {}", command);

        let output =
            self.runner
                .run(command)
                .await
                .map_err(|source| SchedulerError::Spawn {
                    command: command.to_string(),
                    source,
                })?;

        if !output.stdout.is_empty() {
            debug!("stdout: {}", output.stdout);
        }
        if !output.stderr.is_empty() {
            debug!("stderr: {}", output.stderr);
        }

        Ok(output)
    }
}

#[async_trait]
impl<R: CommandRunner> SchedulerClient for LsfClient<R> {
    async fn submit(
        &self,
        command: &str,
        job_name: &str,
        params: &SchedulerParams,
    ) -> Result<JobId> {
        let command_line = Self::submit_command(command, job_name, params);
        let output = self.execute(&command_line).await?;
        Self::parse_submission(&command_line, output)
    }

    async fn running_jobs(&self, by_name: bool) -> Result<HashSet<String>> {
        let output = self.execute(Self::LIST_COMMAND).await?;
        Self::parse_listing(output, by_name)
    }

    async fn kill(&self, targets: &[String], options: &KillOptions) -> Result<()> {
        for command_line in Self::kill_commands(targets, options) {
            let output = self.execute(&command_line).await?;
            Self::check_kill(&command_line, output)?;
        }
        Ok(())
    }
}
