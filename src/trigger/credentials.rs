use std::path::Path;

use crate::kubernetes::model::{ClusterContext, ClusterCredentials, CredentialSource};
use crate::trigger::diagnostics::{Diagnostic, Diagnostics};
use crate::trigger::error::TriggerError;
use crate::trigger::{TriggerDiagnostics, TriggerK8sClient};

/// Sources in the order they are tried.
const SOURCES: [CredentialSource; 2] = [CredentialSource::Kubeconfig, CredentialSource::InCluster];

pub struct CredentialResolver {
    k8s_client: TriggerK8sClient,
    context: Option<ClusterContext>,
    diagnostics: TriggerDiagnostics,
}

impl CredentialResolver {
    pub fn new(
        k8s_client: TriggerK8sClient,
        context: Option<ClusterContext>,
        diagnostics: TriggerDiagnostics,
    ) -> CredentialResolver {
        CredentialResolver {
            k8s_client,
            context,
            diagnostics,
        }
    }

    async fn load(
        &self,
        source: CredentialSource,
        kubeconfig: &Path,
    ) -> anyhow::Result<ClusterCredentials> {
        match source {
            CredentialSource::Kubeconfig => {
                self.k8s_client
                    .load_local_config(kubeconfig, self.context.as_ref())
                    .await
            }
            CredentialSource::InCluster => self.k8s_client.load_ambient_config().await,
        }
    }

    /// Returns the first source that yields credentials. Individual failures
    /// are only surfaced, all together, once every source has failed.
    pub async fn resolve(&self, kubeconfig: &Path) -> Result<ClusterCredentials, TriggerError> {
        let mut failures = Vec::with_capacity(SOURCES.len());
        for source in SOURCES {
            match self.load(source, kubeconfig).await {
                Ok(credentials) => return Ok(credentials),
                Err(e) => {
                    let reason = match source {
                        CredentialSource::Kubeconfig => {
                            format!("{}: {e}", kubeconfig.display())
                        }
                        CredentialSource::InCluster => e.to_string(),
                    };
                    self.diagnostics.emit(Diagnostic::CredentialSourceFailed {
                        source,
                        reason: reason.clone(),
                    });
                    failures.push(reason);
                }
            }
        }

        let reasons = failures.join("; ");
        self.diagnostics.emit(Diagnostic::CredentialsUnavailable {
            reason: reasons.clone(),
        });
        Err(TriggerError::CredentialsUnavailable { reasons })
    }
}
