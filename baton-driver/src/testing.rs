//! Scripted scheduler used by the driver's tests

use async_trait::async_trait;
use baton_client::{Result, SchedulerClient, SchedulerError};
use baton_core::{JobId, KillOptions, SchedulerParams};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// One scripted answer to `running_jobs`; `None` is a listing failure.
pub type Listing = Option<Vec<&'static str>>;

/// Fake scheduler: hands out queued job ids on submit and replays scripted
/// listings. The last listing repeats once the script runs out.
#[derive(Default)]
pub struct FakeScheduler {
    ids: Mutex<VecDeque<&'static str>>,
    listings: Mutex<VecDeque<Listing>>,
    pub submissions: Mutex<Vec<(String, String, SchedulerParams)>>,
    pub listing_calls: Mutex<usize>,
}

impl FakeScheduler {
    pub fn new(ids: Vec<&'static str>, listings: Vec<Listing>) -> Self {
        Self {
            ids: Mutex::new(ids.into()),
            listings: Mutex::new(listings.into()),
            ..Self::default()
        }
    }

    pub fn listing_calls(&self) -> usize {
        *self.listing_calls.lock().unwrap()
    }

    pub fn submitted_names(&self) -> Vec<String> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl SchedulerClient for FakeScheduler {
    async fn submit(
        &self,
        command: &str,
        job_name: &str,
        params: &SchedulerParams,
    ) -> Result<JobId> {
        self.submissions.lock().unwrap().push((
            command.to_string(),
            job_name.to_string(),
            params.clone(),
        ));
        match self.ids.lock().unwrap().pop_front() {
            Some(id) => Ok(JobId::from(id)),
            None => Err(SchedulerError::SubmissionRejected {
                command: format!("bsub {}", job_name),
                exit_code: 1,
                stdout: String::new(),
                stderr: "no scripted id left".to_string(),
            }),
        }
    }

    async fn running_jobs(&self, _by_name: bool) -> Result<HashSet<String>> {
        *self.listing_calls.lock().unwrap() += 1;

        let mut listings = self.listings.lock().unwrap();
        let listing = if listings.len() > 1 {
            listings.pop_front().flatten()
        } else {
            listings.front().cloned().flatten()
        };
        drop(listings);

        match listing {
            Some(ids) => Ok(ids.into_iter().map(str::to_string).collect()),
            None => Err(SchedulerError::ListingFailed {
                command: "bjobs -w".to_string(),
                exit_code: 1,
                stderr: "LSF is down".to_string(),
            }),
        }
    }

    async fn kill(&self, _targets: &[String], _options: &KillOptions) -> Result<()> {
        Ok(())
    }
}
