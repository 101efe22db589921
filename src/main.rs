mod configuration;
mod event;
mod extensions;
mod github;
mod kubernetes;
mod trigger;

use clap::Parser;
use secrecy::SecretString;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::event::model::StatusBatch;
use crate::github::rest::RestGithub;
use crate::kubernetes::kubers::KubeRsBased;
use crate::trigger::diagnostics::TracingDiagnostics;
use crate::trigger::orchestrator::DeployOrchestrator;
use crate::trigger::reducer::BatchResult;
use crate::trigger::{DeploymentTrigger, TriggerDiagnostics, TriggerK8sClient, TriggerSourceControl};

#[derive(Parser)]
#[command(name = "kube-deploy-trigger")]
#[command(about = "Deploy commit images to Kubernetes on CI status events")]
#[command(version)]
struct Cli {
    /// Trigger configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// JSON status batch, `-` reads from stdin
    #[arg(short, long, default_value = "-")]
    events: String,

    #[arg(short, long)]
    verbose: bool,
}

fn read_events(source: &str) -> anyhow::Result<StatusBatch> {
    if source == "-" {
        let mut payload = String::new();
        std::io::stdin().read_to_string(&mut payload)?;
        StatusBatch::from_reader(payload.as_bytes())
    } else {
        StatusBatch::from_reader(std::fs::File::open(source)?)
    }
}

fn github_token(env_name: &str) -> SecretString {
    match std::env::var(env_name) {
        Ok(token) => SecretString::from(token),
        Err(_) => {
            warn!("{env_name} is not set, events will not be deployed");
            SecretString::from(String::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = configuration::load_from_yaml(&cli.config)?;
    let batch = read_events(&cli.events)?;
    info!(events = batch.statuses.len(), "received status batch");

    let k8s_client: TriggerK8sClient = Arc::new(KubeRsBased);
    let source_control: TriggerSourceControl = Arc::new(RestGithub::new(config.github()));
    let diagnostics: TriggerDiagnostics = Arc::new(TracingDiagnostics);
    let orchestrator = DeployOrchestrator::new(
        k8s_client,
        source_control,
        diagnostics,
        github_token(&config.github.token_env),
        config.settings(),
    );

    match DeploymentTrigger::new(orchestrator).handle(batch.statuses).await {
        BatchResult::Success => {
            println!("success");
            Ok(ExitCode::SUCCESS)
        }
        BatchResult::Failure(message) => {
            eprintln!("failure: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
