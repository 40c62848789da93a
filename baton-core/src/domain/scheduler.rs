//! Scheduler submission parameters
//!
//! Typed replacement for free-form scheduler flag maps. The scheduler client
//! turns these into command-line flags; nothing here knows about flag syntax.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters attached to every job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerParams {
    /// Queue the job is submitted to
    pub queue: String,

    /// Memory reservation in megabytes
    pub memory_mb: u64,

    /// Path of the job's output log. `%J` expands to the job id. Also
    /// receives stderr unless `error_log_path` is set.
    pub output_log_path: String,

    /// Separate log for the job's stderr
    pub error_log_path: Option<String>,

    /// Replace existing log files instead of appending to them
    pub overwrite_logs: bool,

    /// Address notified when the job finishes
    pub notify_email: Option<String>,

    /// Template for the scheduler-visible job name.
    /// `{project}` and `{name}` are substituted.
    pub job_name_template: String,

    /// Project prefix substituted into the job name template
    pub project: String,

    /// Optional resource requirement string (e.g. `select[mem>8000]`)
    pub resource_request: Option<String>,
}

impl SchedulerParams {
    /// Defaults with the output log placed under `<workspace>/logs`.
    pub fn for_workspace(workspace: &Path) -> Self {
        Self {
            output_log_path: workspace
                .join("logs")
                .join("%J.out")
                .to_string_lossy()
                .into_owned(),
            ..Self::default()
        }
    }

    /// Renders the scheduler-visible name for a job.
    pub fn render_job_name(&self, name: &str) -> String {
        self.job_name_template
            .replace("{project}", &self.project)
            .replace("{name}", name)
    }
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            queue: "short".to_string(),
            memory_mb: 8000,
            output_log_path: "%J.out".to_string(),
            error_log_path: None,
            overwrite_logs: false,
            notify_email: None,
            job_name_template: "{project}.{name}".to_string(),
            project: "baton".to_string(),
            resource_request: None,
        }
    }
}

/// Flags shared by every kill command issued in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillOptions {
    /// Restrict the kill to jobs owned by this user
    pub user: Option<String>,

    /// Restrict the kill to jobs in this queue
    pub queue: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_job_name() {
        let params = SchedulerParams {
            project: "cohort7".to_string(),
            ..SchedulerParams::default()
        };
        assert_eq!(params.render_job_name("annotate"), "cohort7.annotate");
    }

    #[test]
    fn test_for_workspace_places_logs_in_workspace() {
        let params = SchedulerParams::for_workspace(Path::new("/scratch/run1"));
        assert_eq!(params.output_log_path, "/scratch/run1/logs/%J.out");
        assert_eq!(params.queue, "short");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: SchedulerParams =
            serde_json::from_str(r#"{"queue": "long", "memory_mb": 32000}"#).unwrap();
        assert_eq!(params.queue, "long");
        assert_eq!(params.memory_mb, 32000);
        assert_eq!(params.job_name_template, "{project}.{name}");
        assert_eq!(params.error_log_path, None);
        assert!(!params.overwrite_logs);
    }
}
