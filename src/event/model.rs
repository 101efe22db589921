use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Org {
    pub owner: String,
    pub team: Team,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Repo {
    pub name: String,
    pub org: Org,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub repo: Repo,
    #[serde(default = "Vec::new")]
    pub images: Vec<Image>,
}

/// Commit status notification delivered by the CI system.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub context: String,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub commit: Commit,
}

impl StatusEvent {
    pub fn owner(&self) -> &str {
        &self.commit.repo.org.owner
    }

    pub fn repo(&self) -> &str {
        &self.commit.repo.name
    }

    pub fn team_id(&self) -> &str {
        &self.commit.repo.org.team.id
    }
}

/// Short `owner/repo@sha` form used in log lines and failure messages.
pub struct EventRef<'a>(pub &'a StatusEvent);

impl Display for EventRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.0.owner(),
            self.0.repo(),
            self.0.commit.sha
        )
    }
}

/// One delivery of the status subscription.
#[derive(Debug, Deserialize)]
pub struct StatusBatch {
    #[serde(rename = "Status", default = "Vec::new")]
    pub statuses: Vec<StatusEvent>,
}

impl StatusBatch {
    pub fn from_reader<R: std::io::Read>(reader: R) -> anyhow::Result<StatusBatch> {
        Ok(serde_json::from_reader(reader)?)
    }
}
