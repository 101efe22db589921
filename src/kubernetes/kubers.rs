use async_trait::async_trait;
use std::path::Path;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, Namespace as K8sNamespace, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::api::{Patch, PatchParams, PostParams};
use kube_client::config::{KubeConfigOptions, Kubeconfig};
use kube_client::{Api, Client, Config};
use tracing::{debug, info};

use crate::kubernetes::model::{
    ClusterContext, ClusterCredentials, DeployTarget, K8sClient, NAME_LABEL,
};

pub struct KubeRsBased;

#[async_trait]
impl K8sClient for KubeRsBased {
    async fn load_local_config(
        &self,
        path: &Path,
        context: Option<&ClusterContext>,
    ) -> anyhow::Result<ClusterCredentials> {
        let kubeconfig = Kubeconfig::read_from(path)?;
        let context_options = KubeConfigOptions {
            context: context.map(|c| c.0.clone()),
            ..Default::default()
        };
        let config = Config::from_custom_kubeconfig(kubeconfig, &context_options).await?;
        Ok(ClusterCredentials::Client(config))
    }

    async fn load_ambient_config(&self) -> anyhow::Result<ClusterCredentials> {
        Ok(ClusterCredentials::Cluster(Config::incluster()?))
    }

    async fn upsert_deployment_image(
        &self,
        credentials: &ClusterCredentials,
        target: &DeployTarget,
    ) -> anyhow::Result<()> {
        let client = Client::try_from(credentials.config().clone())?;
        let id = target.deployment_id();
        let namespace = id.namespace.0.as_str();
        let name = id.deployment.0.as_str();

        let namespaces: Api<K8sNamespace> = Api::all(client.clone());
        if namespaces.get_opt(namespace).await?.is_none() {
            info!(namespace, "creating namespace");
            namespaces
                .create(&PostParams::default(), &namespace_manifest(target))
                .await?;
        }

        let deployments: Api<Deployment> = Api::namespaced(client, namespace);
        if deployments.get_opt(name).await?.is_some() {
            debug!(namespace, deployment = name, image = %target.image, "patching deployment image");
            deployments
                .patch(
                    name,
                    &PatchParams::default(),
                    &Patch::Strategic(image_patch(target)),
                )
                .await?;
        } else {
            info!(namespace, deployment = name, image = %target.image, "creating deployment");
            deployments
                .create(&PostParams::default(), &deployment_manifest(target))
                .await?;
        }
        Ok(())
    }
}

fn namespace_manifest(target: &DeployTarget) -> K8sNamespace {
    K8sNamespace {
        metadata: ObjectMeta {
            name: Some(target.deployment_id().namespace.0),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Strategic merge keys containers by name, so only the repo's container changes.
fn image_patch(target: &DeployTarget) -> serde_json::Value {
    let container = target.container_name();
    let image = target.image.0.as_str();
    serde_json::json!({
        "metadata": { "labels": target.labels() },
        "spec": {
            "template": {
                "spec": {
                    "containers": [{
                        "name": container,
                        "image": image,
                    }]
                }
            }
        }
    })
}

fn deployment_manifest(target: &DeployTarget) -> Deployment {
    let id = target.deployment_id();
    let labels = target.labels();
    let selector = [(NAME_LABEL.to_string(), target.container_name())].into();

    Deployment {
        metadata: ObjectMeta {
            name: Some(id.deployment.0),
            namespace: Some(id.namespace.0),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: target.container_name(),
                        image: Some(target.image.0.clone()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
