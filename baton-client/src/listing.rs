//! Live job listing (`bjobs`)

use std::collections::HashSet;

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{Result, SchedulerError};
use crate::lsf::LsfClient;

/// `bjobs` prints this (on stderr) when the user has no unfinished jobs.
const NO_JOBS_MARKER: &str = "No unfinished job found";

/// `bjobs -w` columns: JOBID USER STAT QUEUE FROM_HOST EXEC_HOST JOB_NAME
/// SUBMIT_TIME. The submit time contains spaces, so lines are split into at
/// most this many columns and the last one keeps the remainder.
const LISTING_COLUMNS: usize = 8;

impl<R: CommandRunner> LsfClient<R> {
    pub(crate) const LIST_COMMAND: &'static str = "bjobs -w";

    /// Extracts job ids (or names) from `bjobs -w` output.
    pub(crate) fn parse_listing(output: CommandOutput, by_name: bool) -> Result<HashSet<String>> {
        if !output.success() {
            if output.stderr.contains(NO_JOBS_MARKER) {
                return Ok(HashSet::new());
            }
            return Err(SchedulerError::ListingFailed {
                command: Self::LIST_COMMAND.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(output
            .stdout
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let columns = split_columns(line, LISTING_COLUMNS);
                let index = if by_name {
                    columns.len().checked_sub(2)?
                } else {
                    0
                };
                columns.get(index).map(|column| column.to_string())
            })
            .collect())
    }
}

/// Splits on runs of whitespace into at most `max` columns; the final
/// column holds the unsplit remainder of the line.
fn split_columns(line: &str, max: usize) -> Vec<&str> {
    let mut columns = Vec::with_capacity(max);
    let mut rest = line.trim();

    while !rest.is_empty() {
        if columns.len() + 1 == max {
            columns.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                columns.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                columns.push(rest);
                break;
            }
        }
    }

    columns
}
