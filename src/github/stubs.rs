use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};

use crate::github::model::{CommitStatus, CommitStatusReporter, Reporter, SourceControl};

/// Records every status it is asked to set, failing when `error` is set.
#[derive(Default)]
pub struct RecordingReporter {
    pub error: Option<String>,
    pub statuses: Mutex<Vec<CommitStatus>>,
}

impl RecordingReporter {
    pub fn statuses(&self) -> Vec<CommitStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommitStatusReporter for RecordingReporter {
    async fn set_commit_status(&self, status: &CommitStatus) -> anyhow::Result<()> {
        self.statuses.lock().unwrap().push(status.clone());
        match &self.error {
            Some(reason) => Err(anyhow::Error::msg(reason.clone())),
            None => Ok(()),
        }
    }
}

pub struct StubGithub {
    pub reporter: Arc<RecordingReporter>,
    pub auth_error: Option<String>,
}

impl StubGithub {
    pub fn accepting() -> StubGithub {
        StubGithub {
            reporter: Arc::new(RecordingReporter::default()),
            auth_error: None,
        }
    }

    pub fn rejecting(reason: &str) -> StubGithub {
        StubGithub {
            auth_error: Some(reason.to_string()),
            ..StubGithub::accepting()
        }
    }

    pub fn failing_status(reason: &str) -> StubGithub {
        StubGithub {
            reporter: Arc::new(RecordingReporter {
                error: Some(reason.to_string()),
                ..Default::default()
            }),
            auth_error: None,
        }
    }
}

#[async_trait]
impl SourceControl for StubGithub {
    async fn authenticate(&self, _token: &SecretString) -> anyhow::Result<Reporter> {
        match &self.auth_error {
            Some(reason) => Err(anyhow::Error::msg(reason.clone())),
            None => {
                let reporter: Reporter = self.reporter.clone();
                Ok(reporter)
            }
        }
    }
}
