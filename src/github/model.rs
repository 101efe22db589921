use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitStatus {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub team_id: String,
    pub environment: String,
    pub context: String,
    pub description: Option<String>,
    pub state: CommitState,
}

#[async_trait]
pub trait CommitStatusReporter {
    async fn set_commit_status(&self, status: &CommitStatus) -> anyhow::Result<()>;
}

pub type Reporter = Arc<dyn CommitStatusReporter + Send + Sync + 'static>;

/// Entry point to the source-control API. Authentication yields a reporter
/// bound to the supplied token.
#[async_trait]
pub trait SourceControl {
    async fn authenticate(&self, token: &SecretString) -> anyhow::Result<Reporter>;
}
