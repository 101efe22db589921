use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::github::model::{CommitState, CommitStatus, CommitStatusReporter, Reporter, SourceControl};

const USER_AGENT: &str = concat!("kube-deploy-trigger/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub target_url_base: String,
}

pub struct RestGithub {
    config: Arc<Config>,
}

impl RestGithub {
    pub fn new(config: Config) -> RestGithub {
        RestGithub {
            config: Arc::new(Config {
                api_url: config.api_url.trim_end_matches('/').to_string(),
                target_url_base: config.target_url_base.trim_end_matches('/').to_string(),
            }),
        }
    }
}

#[async_trait]
impl SourceControl for RestGithub {
    async fn authenticate(&self, token: &SecretString) -> anyhow::Result<Reporter> {
        let token = token.expose_secret();
        if token.trim().is_empty() {
            anyhow::bail!("GitHub token is empty");
        }
        let mut authorization = header::HeaderValue::from_str(&format!("token {token}"))?;
        authorization.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Arc::new(RestStatusReporter {
            client,
            config: self.config.clone(),
        }))
    }
}

struct RestStatusReporter {
    client: Client,
    config: Arc<Config>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StatusRequest<'a> {
    state: CommitState,
    context: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    target_url: String,
}

fn statuses_url(config: &Config, status: &CommitStatus) -> String {
    format!(
        "{}/repos/{}/{}/statuses/{}",
        config.api_url, status.owner, status.repo, status.sha
    )
}

fn status_request<'a>(config: &Config, status: &'a CommitStatus) -> StatusRequest<'a> {
    StatusRequest {
        state: status.state,
        context: &status.context,
        description: status.description.as_deref(),
        target_url: format!(
            "{}/{}/{}/{}/{}",
            config.target_url_base, status.team_id, status.environment, status.owner, status.repo
        ),
    }
}

#[async_trait]
impl CommitStatusReporter for RestStatusReporter {
    async fn set_commit_status(&self, status: &CommitStatus) -> anyhow::Result<()> {
        let url = statuses_url(&self.config, status);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&status_request(&self.config, status))
            .send()
            .await?;

        if !response.status().is_success() {
            let code = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("setting commit status failed: {} - {}", code, body);
            anyhow::bail!("GitHub responded {code}: {body}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config {
            api_url: "https://api.github.com/".to_string(),
            target_url_base: "https://deploy.example.com/".to_string(),
        }
    }

    fn status(description: Option<&str>) -> CommitStatus {
        CommitStatus {
            owner: "acme".to_string(),
            repo: "app".to_string(),
            sha: "abc123".to_string(),
            team_id: "T1".to_string(),
            environment: "staging".to_string(),
            context: "deploy/staging".to_string(),
            description: description.map(str::to_string),
            state: CommitState::Success,
        }
    }

    #[test]
    fn request_carries_target_url_and_context() {
        let github = RestGithub::new(config());
        let status = status(Some("build passed"));

        let body = serde_json::to_value(status_request(&github.config, &status)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "state": "success",
                "context": "deploy/staging",
                "description": "build passed",
                "target_url": "https://deploy.example.com/T1/staging/acme/app",
            })
        );
        assert_eq!(
            statuses_url(&github.config, &status),
            "https://api.github.com/repos/acme/app/statuses/abc123"
        );
    }

    #[test]
    fn absent_description_is_omitted() {
        let github = RestGithub::new(config());
        let mut status = status(None);
        status.state = CommitState::Failure;

        let body = serde_json::to_value(status_request(&github.config, &status)).unwrap();

        assert_eq!(body["state"], "failure");
        assert!(body.get("description").is_none());
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let github = RestGithub::new(config());

        let result = github.authenticate(&SecretString::from("  ".to_string())).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn token_with_control_characters_is_rejected() {
        let github = RestGithub::new(config());

        let result = github
            .authenticate(&SecretString::from("bad\ntoken".to_string()))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn valid_token_authenticates_without_network() {
        let github = RestGithub::new(config());

        let result = github
            .authenticate(&SecretString::from("ghp_example".to_string()))
            .await;

        assert!(result.is_ok());
    }
}
