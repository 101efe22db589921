use std::fmt::{Display, Formatter};
use tracing::debug;

use crate::kubernetes::model::CredentialSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    ContextPrefix { context: String, prefix: String },
    EmptyEnvironment { context: String },
    ImageCount { count: usize, images: Vec<String> },
    AlreadyTargeted { target_url: String },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ContextPrefix { context, prefix } => write!(
                f,
                "commit status context '{context}' does not start with '{prefix}'"
            ),
            SkipReason::EmptyEnvironment { context } => write!(
                f,
                "commit status context '{context}' names no environment"
            ),
            SkipReason::ImageCount { count, images } => {
                write!(f, "commit has {count} Docker images: {images:?}")
            }
            SkipReason::AlreadyTargeted { target_url } => {
                write!(f, "status already has a targetUrl: {target_url}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    NotEligible {
        event: String,
        reason: SkipReason,
    },
    CredentialSourceFailed {
        source: CredentialSource,
        reason: String,
    },
    CredentialsUnavailable {
        reason: String,
    },
}

/// Side channel for the decisions of the eligibility filter and the
/// credential resolver.
pub trait Diagnostics {
    fn emit(&self, diagnostic: Diagnostic);
}

pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::NotEligible { event, reason } => {
                debug!(%event, "not eligible for deploy: {reason}")
            }
            Diagnostic::CredentialSourceFailed { source, reason } => {
                debug!(%source, "failed to use {source}: {reason}")
            }
            // The degraded outcome carries the warning.
            Diagnostic::CredentialsUnavailable { reason } => {
                debug!("no cluster credentials: {reason}")
            }
        }
    }
}
