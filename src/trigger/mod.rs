pub mod credentials;
pub mod diagnostics;
pub mod eligibility;
pub mod error;
pub mod orchestrator;
pub mod reducer;

use futures::future::join_all;
use std::sync::Arc;
use tokio::spawn;

use crate::event::model::{EventRef, StatusEvent};
use crate::github::model::SourceControl;
use crate::kubernetes::model::K8sClient;
use crate::trigger::diagnostics::Diagnostics;
use crate::trigger::orchestrator::DeployOrchestrator;
use crate::trigger::reducer::{reduce, BatchResult, DeployOutcome};

// Thread safe type aliases
pub type TriggerK8sClient = Arc<dyn K8sClient + Send + Sync + 'static>;
pub type TriggerSourceControl = Arc<dyn SourceControl + Send + Sync + 'static>;
pub type TriggerDiagnostics = Arc<dyn Diagnostics + Send + Sync + 'static>;

/// Runs every event of a delivery as its own task and joins them into one
/// result. A failing or panicking event never cancels its siblings.
pub struct DeploymentTrigger {
    orchestrator: Arc<DeployOrchestrator>,
}

impl DeploymentTrigger {
    pub fn new(orchestrator: DeployOrchestrator) -> DeploymentTrigger {
        DeploymentTrigger {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub async fn handle(&self, events: Vec<StatusEvent>) -> BatchResult {
        let labels: Vec<String> = events
            .iter()
            .map(|event| EventRef(event).to_string())
            .collect();

        let tasks = events.into_iter().map(|event| {
            let orchestrator = self.orchestrator.clone();
            spawn(async move { orchestrator.handle(&event).await })
        });

        let outcomes = join_all(tasks)
            .await
            .into_iter()
            .zip(labels)
            .map(|(joined, label)| match joined {
                Ok(outcome) => outcome,
                Err(e) => DeployOutcome::Failure(format!("handling {label} did not complete: {e}")),
            });

        reduce(outcomes)
    }
}
