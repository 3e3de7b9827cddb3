mod config;
mod generator;
mod model;
mod output;
mod pipeline;
#[cfg(test)]
mod test_server;
mod tracker;
mod util;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use generator::openai::OpenAiClient;
use generator::TextGenerator;
use model::record::{Credentials, WorkflowRecord};
use tracker::jira::JiraClient;
use tracker::Tracker;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = config::load_config()?;

    let span = info_span!(
        "sprint_changelog",
        sprint = %config.sprint_name,
        telemetry = config.telemetry.enabled,
        telemetry_project = %config.telemetry.project,
        telemetry_key_set = config.telemetry.api_key.is_some(),
    );
    run(config).instrument(span).await
}

async fn run(config: AppConfig) -> Result<()> {
    println!("Starting JIRA Ticket Fetcher\n");

    let timeout = config.settings.pipeline.request_timeout();
    let record = WorkflowRecord::new(
        config.jira.url.clone(),
        Credentials {
            email: config.jira.email.clone(),
            api_token: config.jira.api_token.clone(),
        },
    );

    let tracker: Arc<dyn Tracker> = Arc::new(
        JiraClient::new(&record.endpoint, &record.credentials, timeout)
            .context("Failed to build Jira client")?,
    );
    let generator: Arc<dyn TextGenerator> = Arc::new(
        OpenAiClient::new(
            config.openai_api_key.clone(),
            &config.settings.generation,
            timeout,
        )
        .context("Failed to build generation client")?,
    );

    let pipeline = pipeline::standard(&config, tracker, generator);
    info!(steps = ?pipeline.step_names(), "Pipeline ready");
    let final_record = pipeline.run(record).await;

    println!("\nWorkflow completed!");

    if let Some(identity) = &final_record.identity {
        info!(
            account_id = identity.account_id.as_deref().unwrap_or("N/A"),
            "Ran as authenticated user"
        );
    }
    if let Some(err) = &final_record.error {
        error!(error = %err, "Workflow finished with an error");
    }

    if let Some(path) = output::export_issues(&config.settings.pipeline.output_dir, &final_record)? {
        info!(path = %path.display(), "Tickets saved");
        println!("Tickets saved to {}", path.display());
    }

    Ok(())
}
