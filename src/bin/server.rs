use clap::Parser;
use dealrun::config::{credential_from_env, ServerConfig, WorkflowConfig};
use dealrun::server::{create_router, AppState};
use dealrun::utils::{logger, validation::Validate};
use dealrun::{HttpAutomationAgent, SessionRunner};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("🚀 Starting dealrun server");

    let workflow_config = match &config.config {
        Some(path) => match WorkflowConfig::from_file(path) {
            Ok(loaded) => {
                tracing::info!("📁 Loaded workflow config from: {}", path);
                loaded
            }
            Err(e) => {
                eprintln!("❌ Failed to load workflow config '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML");
                std::process::exit(1);
            }
        },
        None => WorkflowConfig::default(),
    };

    // An unusable agent endpoint leaves the server up but rejecting every
    // task submission.
    let runner = match config.validate() {
        Ok(()) => {
            let credential = credential_from_env();
            if credential.is_none() {
                tracing::warn!(
                    "⚠️ No GEMINI_API_KEY or GOOGLE_API_KEY set; sessions will fail until one is provided"
                );
            }
            Some(SessionRunner::new(Arc::new(HttpAutomationAgent::new(
                config.agent_endpoint.clone(),
                config.model.clone(),
                credential,
            ))))
        }
        Err(e) => {
            tracing::error!("❌ Automation capability unavailable: {}", e);
            None
        }
    };

    let state = Arc::new(AppState::new(runner, Arc::new(workflow_config)));
    let router = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("✅ Listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
