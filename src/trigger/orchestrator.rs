use secrecy::SecretString;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::event::model::{EventRef, StatusEvent};
use crate::extensions::option::OptionStrExt;
use crate::github::model::{CommitState, CommitStatus, CommitStatusReporter};
use crate::kubernetes::model::{ClusterContext, ClusterCredentials, DeployTarget, ImageReference};
use crate::trigger::credentials::CredentialResolver;
use crate::trigger::eligibility::{decide, DeployDecision};
use crate::trigger::error::TriggerError;
use crate::trigger::reducer::DeployOutcome;
use crate::trigger::{TriggerDiagnostics, TriggerK8sClient, TriggerSourceControl};

pub struct Settings {
    pub context_prefix: String,
    pub kubeconfig: PathBuf,
    pub kube_context: Option<ClusterContext>,
}

/// Handles a single status event from eligibility to status report.
/// Holds only shared read-only state, so one instance serves concurrent events.
pub struct DeployOrchestrator {
    k8s_client: TriggerK8sClient,
    source_control: TriggerSourceControl,
    diagnostics: TriggerDiagnostics,
    resolver: CredentialResolver,
    token: SecretString,
    settings: Settings,
}

impl DeployOrchestrator {
    pub fn new(
        k8s_client: TriggerK8sClient,
        source_control: TriggerSourceControl,
        diagnostics: TriggerDiagnostics,
        token: SecretString,
        settings: Settings,
    ) -> DeployOrchestrator {
        let resolver = CredentialResolver::new(
            k8s_client.clone(),
            settings.kube_context.clone(),
            diagnostics.clone(),
        );
        DeployOrchestrator {
            k8s_client,
            source_control,
            diagnostics,
            resolver,
            token,
            settings,
        }
    }

    pub async fn handle(&self, event: &StatusEvent) -> DeployOutcome {
        let target = match decide(
            event,
            &self.settings.context_prefix,
            self.diagnostics.as_ref(),
        ) {
            DeployDecision::Skip => return DeployOutcome::Success,
            DeployDecision::Proceed { environment, image } => {
                deploy_target(event, environment, image)
            }
        };

        let result = self.deploy(event, target).await;
        outcome(event, result)
    }

    /// Authenticates, resolves cluster credentials, then upserts and reports.
    pub async fn deploy(
        &self,
        event: &StatusEvent,
        target: DeployTarget,
    ) -> Result<(), TriggerError> {
        let reporter = self
            .source_control
            .authenticate(&self.token)
            .await
            .map_err(|source| TriggerError::AuthFailure { source })?;
        let credentials = self.resolver.resolve(&self.settings.kubeconfig).await?;

        info!(
            event = %EventRef(event),
            image = %target.image,
            environment = %target.environment,
            cluster = %credentials.endpoint(),
            credentials = %credentials.source(),
            "deploying"
        );
        self.upsert_and_report(event, &target, &credentials, reporter.as_ref())
            .await
    }

    async fn upsert_and_report(
        &self,
        event: &StatusEvent,
        target: &DeployTarget,
        credentials: &ClusterCredentials,
        reporter: &(dyn CommitStatusReporter + Send + Sync),
    ) -> Result<(), TriggerError> {
        if let Err(source) = self
            .k8s_client
            .upsert_deployment_image(credentials, target)
            .await
        {
            let failed = self.commit_status(event, target, CommitState::Failure);
            // Best effort, the upsert error is what gets reported.
            if let Err(e) = reporter.set_commit_status(&failed).await {
                warn!(event = %EventRef(event), "failed to report deploy failure: {e}");
            }
            return Err(TriggerError::UpsertFailure {
                image: target.image.clone(),
                source,
            });
        }

        let succeeded = self.commit_status(event, target, CommitState::Success);
        reporter
            .set_commit_status(&succeeded)
            .await
            .map_err(|source| TriggerError::StatusReportFailure {
                image: target.image.clone(),
                source,
            })
    }

    fn commit_status(
        &self,
        event: &StatusEvent,
        target: &DeployTarget,
        state: CommitState,
    ) -> CommitStatus {
        CommitStatus {
            owner: target.owner.clone(),
            repo: target.repo.clone(),
            sha: event.commit.sha.clone(),
            team_id: target.team_id.clone(),
            environment: target.environment.clone(),
            context: format!("{}{}", self.settings.context_prefix, target.environment),
            description: event.description.non_empty().map(str::to_string),
            state,
        }
    }
}

fn deploy_target(event: &StatusEvent, environment: String, image: ImageReference) -> DeployTarget {
    DeployTarget {
        owner: event.owner().to_string(),
        repo: event.repo().to_string(),
        team_id: event.team_id().to_string(),
        environment,
        image,
    }
}

fn outcome(event: &StatusEvent, result: Result<(), TriggerError>) -> DeployOutcome {
    match result {
        Ok(()) => DeployOutcome::Success,
        Err(e) if e.is_degraded() => {
            warn!(event = %EventRef(event), "{e}");
            DeployOutcome::Success
        }
        Err(e) => {
            error!(event = %EventRef(event), "{e}");
            DeployOutcome::Failure(e.to_string())
        }
    }
}
