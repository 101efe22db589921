use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use crate::kubernetes::model::{
    ClusterContext, ClusterCredentials, DeployTarget, K8sClient,
};

pub fn stub_config() -> kube_client::Config {
    kube_client::Config::new("https://stub.cluster.local:6443".parse().unwrap())
}

/// Cluster stub with scripted outcomes. `None` means the call succeeds.
#[derive(Default)]
pub struct StubCluster {
    pub local_error: Option<String>,
    pub ambient_error: Option<String>,
    pub upsert_error: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub upserts: Mutex<Vec<DeployTarget>>,
}

impl StubCluster {
    pub fn healthy() -> StubCluster {
        StubCluster::default()
    }

    pub fn without_credentials() -> StubCluster {
        StubCluster {
            local_error: Some("no such file".to_string()),
            ambient_error: Some("not running in a cluster".to_string()),
            ..Default::default()
        }
    }

    pub fn failing_upserts(reason: &str) -> StubCluster {
        StubCluster {
            upsert_error: Some(reason.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upserts(&self) -> Vec<DeployTarget> {
        self.upserts.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn scripted<T>(error: &Option<String>, value: T) -> anyhow::Result<T> {
    match error {
        Some(reason) => Err(anyhow::Error::msg(reason.clone())),
        None => Ok(value),
    }
}

#[async_trait]
impl K8sClient for StubCluster {
    async fn load_local_config(
        &self,
        _path: &Path,
        _context: Option<&ClusterContext>,
    ) -> anyhow::Result<ClusterCredentials> {
        self.record("load_local_config");
        scripted(&self.local_error, ClusterCredentials::Client(stub_config()))
    }

    async fn load_ambient_config(&self) -> anyhow::Result<ClusterCredentials> {
        self.record("load_ambient_config");
        scripted(&self.ambient_error, ClusterCredentials::Cluster(stub_config()))
    }

    async fn upsert_deployment_image(
        &self,
        _credentials: &ClusterCredentials,
        target: &DeployTarget,
    ) -> anyhow::Result<()> {
        self.record("upsert_deployment_image");
        self.upserts.lock().unwrap().push(target.clone());
        scripted(&self.upsert_error, ())
    }
}
