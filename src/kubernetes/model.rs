use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const NAME_LABEL: &str = "app.kubernetes.io/name";
pub const PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
pub const TEAM_LABEL: &str = "deploy-trigger/team-id";
pub const ENVIRONMENT_LABEL: &str = "deploy-trigger/environment";

#[derive(Clone, Debug, Deserialize, Hash, Eq, PartialEq)]
pub struct ClusterContext(pub String);

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Namespace(pub String);

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct DeploymentName(pub String);

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ImageReference(pub String);

impl Display for ImageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct DeploymentId {
    pub namespace: Namespace,
    pub deployment: DeploymentName,
}

/// Everything needed to place one image in one environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployTarget {
    pub owner: String,
    pub repo: String,
    pub team_id: String,
    pub environment: String,
    pub image: ImageReference,
}

impl DeployTarget {
    /// Namespace is the environment, deployment and container are named after the repo.
    pub fn deployment_id(&self) -> DeploymentId {
        DeploymentId {
            namespace: Namespace(self.environment.to_lowercase()),
            deployment: DeploymentName(self.container_name()),
        }
    }

    pub fn container_name(&self) -> String {
        self.repo.to_lowercase()
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (NAME_LABEL.to_string(), self.repo.to_lowercase()),
            (PART_OF_LABEL.to_string(), self.owner.to_lowercase()),
            (TEAM_LABEL.to_string(), self.team_id.clone()),
            (ENVIRONMENT_LABEL.to_string(), self.environment.clone()),
        ])
    }
}

/// Which source produced a set of cluster credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Kubeconfig,
    InCluster,
}

impl Display for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Kubeconfig => f.write_str("kubeconfig"),
            CredentialSource::InCluster => f.write_str("in-cluster config"),
        }
    }
}

/// Client credentials come from a kubeconfig file, cluster credentials from the
/// service account the process runs under.
#[derive(Clone, Debug)]
pub enum ClusterCredentials {
    Client(kube_client::Config),
    Cluster(kube_client::Config),
}

impl ClusterCredentials {
    pub fn source(&self) -> CredentialSource {
        match self {
            ClusterCredentials::Client(_) => CredentialSource::Kubeconfig,
            ClusterCredentials::Cluster(_) => CredentialSource::InCluster,
        }
    }

    pub fn config(&self) -> &kube_client::Config {
        match self {
            ClusterCredentials::Client(config) | ClusterCredentials::Cluster(config) => config,
        }
    }

    pub fn endpoint(&self) -> String {
        self.config().cluster_url.to_string()
    }
}

#[async_trait]
pub trait K8sClient {
    async fn load_local_config(
        &self,
        path: &Path,
        context: Option<&ClusterContext>,
    ) -> anyhow::Result<ClusterCredentials>;

    async fn load_ambient_config(&self) -> anyhow::Result<ClusterCredentials>;

    async fn upsert_deployment_image(
        &self,
        credentials: &ClusterCredentials,
        target: &DeployTarget,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target() -> DeployTarget {
        DeployTarget {
            owner: "Acme".to_string(),
            repo: "Billing-API".to_string(),
            team_id: "T1".to_string(),
            environment: "Staging".to_string(),
            image: ImageReference("registry/billing:1".to_string()),
        }
    }

    #[test]
    fn deployment_id_follows_naming_convention() {
        assert_eq!(
            target().deployment_id(),
            DeploymentId {
                namespace: Namespace("staging".to_string()),
                deployment: DeploymentName("billing-api".to_string()),
            }
        );
    }

    #[test]
    fn labels_scope_owner_team_and_environment() {
        let labels = target().labels();

        assert_eq!(labels[NAME_LABEL], "billing-api");
        assert_eq!(labels[PART_OF_LABEL], "acme");
        assert_eq!(labels[TEAM_LABEL], "T1");
        assert_eq!(labels[ENVIRONMENT_LABEL], "Staging");
    }

    #[test]
    fn credentials_report_their_source() {
        let config = kube_client::Config::new("https://cluster.example:6443".parse().unwrap());

        let client = ClusterCredentials::Client(config.clone());
        let cluster = ClusterCredentials::Cluster(config);

        assert_eq!(client.source(), CredentialSource::Kubeconfig);
        assert_eq!(cluster.source(), CredentialSource::InCluster);
        assert!(client.endpoint().starts_with("https://cluster.example:6443"));
    }
}
