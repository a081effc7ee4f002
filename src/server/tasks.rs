use crate::app::workflows::{ComparisonWorkflow, EventWorkflow, FixedMenuSource};
use crate::core::session::SessionRunner;
use crate::domain::model::{EventPlan, TaskCategory, TaskRequest};
use crate::server::AppState;
use crate::utils::error::Result;
use std::sync::Arc;

/// Drive one accepted task to completion, broadcasting a start notice,
/// per-stage progress, and exactly one terminal notice. Subscribers may all
/// be gone; the workflow still runs to its end.
pub async fn run_task(state: Arc<AppState>, runner: SessionRunner, request: TaskRequest) {
    let registry = state.registry.clone();
    let config = state.workflow_config.clone();

    registry
        .broadcast(&format!(
            "🚀 Starting executor for persona: {}",
            request.persona_label()
        ))
        .await;

    let outcome: Result<serde_json::Value> = match request {
        TaskRequest::Shopper { product } => {
            let (a, b) = config.platform_pair(TaskCategory::Shopping);
            registry
                .broadcast(&format!("Searching for {} on {}/{}...", product, a, b))
                .await;
            let workflow =
                ComparisonWorkflow::new(runner, &config, TaskCategory::Shopping, product);
            let outcome = workflow.run(registry.as_ref()).await;
            serde_json::to_value(&outcome).map_err(Into::into)
        }
        TaskRequest::Rider { pickup, drop } => {
            registry
                .broadcast(&format!("Comparing rides from {} to {}...", pickup, drop))
                .await;
            let query = format!("ride from {} to {}", pickup, drop);
            let workflow = ComparisonWorkflow::new(runner, &config, TaskCategory::Ride, query);
            let outcome = workflow.run(registry.as_ref()).await;
            serde_json::to_value(&outcome).map_err(Into::into)
        }
        TaskRequest::Patient { medicine } => {
            registry
                .broadcast(&format!("Searching for medicine: {}...", medicine))
                .await;
            let workflow =
                ComparisonWorkflow::new(runner, &config, TaskCategory::Pharmacy, medicine);
            let outcome = workflow.run(registry.as_ref()).await;
            serde_json::to_value(&outcome).map_err(Into::into)
        }
        TaskRequest::Coordinator { event_name, guests } => {
            registry
                .broadcast(&format!("🎪 Orchestrating event: {}", event_name))
                .await;
            // The HTTP payload carries no logistics requests; see DESIGN.md.
            let plan = EventPlan {
                name: event_name,
                guests,
                logistics: Vec::new(),
            };
            let workflow = EventWorkflow::new(runner, Arc::new(FixedMenuSource), &config);
            let report = workflow.run(&plan, registry.as_ref()).await;
            serde_json::to_value(&report).map_err(Into::into)
        }
    };

    match outcome {
        Ok(result) => {
            registry
                .broadcast(&format!("✅ Task complete. Result: {}", result))
                .await;
        }
        Err(e) => {
            tracing::error!("Task error: {}", e);
            registry.broadcast(&format!("🔥 Error: {}", e)).await;
        }
    }
}
