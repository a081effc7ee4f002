use clap::Parser;
use dealrun::app::workflows::ComparisonWorkflow;
use dealrun::config::{credential_from_env, CliConfig, WorkflowConfig};
use dealrun::core::workflow::LogSink;
use dealrun::utils::{logger, validation::Validate};
use dealrun::{HttpAutomationAgent, SessionRunner};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting dealrun CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // An unusable agent endpoint means no automation capability at all;
    // that is the one startup-fatal condition.
    if let Err(e) = config.validate() {
        tracing::error!("❌ Automation capability unavailable: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let credential = credential_from_env();
    if credential.is_none() {
        tracing::warn!(
            "⚠️ No GEMINI_API_KEY or GOOGLE_API_KEY set; sessions will fail until one is provided"
        );
    }

    let agent = Arc::new(HttpAutomationAgent::new(
        config.agent_endpoint.clone(),
        config.model.clone(),
        credential,
    ));
    let runner = SessionRunner::new(agent);

    let workflow_config = WorkflowConfig::default();
    let workflow = ComparisonWorkflow::new(
        runner,
        &workflow_config,
        config.task.into(),
        config.query.clone(),
    );

    let outcome = workflow.run(&LogSink).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
