use crate::event::model::{EventRef, StatusEvent};
use crate::extensions::option::OptionStrExt;
use crate::kubernetes::model::ImageReference;
use crate::trigger::diagnostics::{Diagnostic, Diagnostics, SkipReason};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployDecision {
    Skip,
    Proceed {
        environment: String,
        image: ImageReference,
    },
}

fn check(event: &StatusEvent, prefix: &str) -> Result<DeployDecision, SkipReason> {
    let environment = event
        .context
        .strip_prefix(prefix)
        .ok_or_else(|| SkipReason::ContextPrefix {
            context: event.context.clone(),
            prefix: prefix.to_string(),
        })?;
    if environment.is_empty() {
        return Err(SkipReason::EmptyEnvironment {
            context: event.context.clone(),
        });
    }

    let image = match event.commit.images.as_slice() {
        [image] => ImageReference(image.image_name.clone()),
        images => {
            return Err(SkipReason::ImageCount {
                count: images.len(),
                images: images.iter().map(|image| image.image_name.clone()).collect(),
            })
        }
    };

    if let Some(target_url) = event.target_url.non_empty() {
        return Err(SkipReason::AlreadyTargeted {
            target_url: target_url.to_string(),
        });
    }

    Ok(DeployDecision::Proceed {
        environment: environment.to_string(),
        image,
    })
}

/// Decides whether a status event should be deployed. Rules are checked in
/// order: context prefix with a non-empty environment, exactly one image,
/// no target URL yet.
pub fn decide(event: &StatusEvent, prefix: &str, diagnostics: &dyn Diagnostics) -> DeployDecision {
    match check(event, prefix) {
        Ok(decision) => decision,
        Err(reason) => {
            diagnostics.emit(Diagnostic::NotEligible {
                event: EventRef(event).to_string(),
                reason,
            });
            DeployDecision::Skip
        }
    }
}
