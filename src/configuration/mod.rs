use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::github::rest;
use crate::kubernetes::model::ClusterContext;
use crate::trigger::orchestrator::Settings;

fn default_context_prefix() -> String {
    "deploy/".to_string()
}

fn default_kubeconfig() -> PathBuf {
    PathBuf::from("../creds/kube/config")
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusConfig {
    pub target_url_base: String,
}

#[derive(Debug, Deserialize)]
pub struct TriggerConfig {
    #[serde(default = "default_context_prefix")]
    pub context_prefix: String,
    #[serde(default = "default_kubeconfig")]
    pub kubeconfig: PathBuf,
    #[serde(default)]
    pub kube_context: Option<ClusterContext>,
    #[serde(default)]
    pub github: GithubConfig,
    pub status: StatusConfig,
}

impl TriggerConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            context_prefix: self.context_prefix.clone(),
            kubeconfig: self.kubeconfig.clone(),
            kube_context: self.kube_context.clone(),
        }
    }

    pub fn github(&self) -> rest::Config {
        rest::Config {
            api_url: self.github.api_url.clone(),
            target_url_base: self.status.target_url_base.clone(),
        }
    }
}

pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<TriggerConfig> {
    let conf_file = std::fs::File::open(path)?;
    Ok(serde_yaml::from_reader(conf_file)?)
}
