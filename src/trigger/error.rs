use crate::kubernetes::model::ImageReference;

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("failed to authenticate with GitHub using token, will not deploy: {source}")]
    AuthFailure { source: anyhow::Error },

    #[error("failed to use either kubeconfig or in-cluster config, will not deploy: {reasons}")]
    CredentialsUnavailable { reasons: String },

    #[error("failed to deploy image {image}: {source}")]
    UpsertFailure {
        image: ImageReference,
        source: anyhow::Error,
    },

    #[error("deployed image {image} but failed to update status: {source}")]
    StatusReportFailure {
        image: ImageReference,
        source: anyhow::Error,
    },
}

impl TriggerError {
    /// Auth and credential problems leave the event for a later delivery.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            TriggerError::AuthFailure { .. } | TriggerError::CredentialsUnavailable { .. }
        )
    }
}
