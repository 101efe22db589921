#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployOutcome {
    Success,
    Failure(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchResult {
    Success,
    Failure(String),
}

/// Success only when every outcome succeeded, otherwise all failure messages in order.
pub fn reduce<I>(outcomes: I) -> BatchResult
where
    I: IntoIterator<Item = DeployOutcome>,
{
    let failures: Vec<String> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            DeployOutcome::Success => None,
            DeployOutcome::Failure(message) => Some(message),
        })
        .collect();

    if failures.is_empty() {
        BatchResult::Success
    } else {
        BatchResult::Failure(failures.join("; "))
    }
}
