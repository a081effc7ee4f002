use crate::config::WorkflowConfig;
use crate::core::compare;
use crate::core::session::SessionRunner;
use crate::core::workflow::{StageReport, Workflow, WorkflowContext, WorkflowStage};
use crate::domain::model::{ComparisonVerdict, SessionResult, TaskCategory};
use crate::domain::ports::StatusSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// Final document of a comparison run; the CLI prints this as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub query: String,
    pub category: String,
    #[serde(flatten)]
    pub verdict: ComparisonVerdict,
}

struct PlatformSearchStage {
    name: String,
    runner: SessionRunner,
    platform: String,
    query: String,
    item_type: String,
}

#[async_trait]
impl WorkflowStage for PlatformSearchStage {
    async fn run(&self, _context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        sink.emit(&format!(
            "🔎 Searching {} for '{}'...",
            self.platform, self.query
        ))
        .await;

        let result = self
            .runner
            .run_search(&self.platform, &self.query, &self.item_type)
            .await;

        if result.is_success() {
            sink.emit(&format!(
                "📦 {} returned {} valid item(s)",
                self.platform,
                result.items.len()
            ))
            .await;
        } else {
            sink.emit(&format!("⚠️ {} session failed", self.platform))
                .await;
        }

        let mut report = StageReport::new(&self.name);
        report.record_session(result);
        Ok(report)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct CompareStage {
    platform_a: String,
    platform_b: String,
}

#[async_trait]
impl WorkflowStage for CompareStage {
    async fn run(&self, context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        let fallback_a = SessionResult::failed(&self.platform_a, "");
        let fallback_b = SessionResult::failed(&self.platform_b, "");
        let result_a = context
            .session_result(&self.platform_a)
            .unwrap_or(&fallback_a);
        let result_b = context
            .session_result(&self.platform_b)
            .unwrap_or(&fallback_b);

        let (winner, recommendation) =
            compare::choose_winner(result_a, result_b, &self.platform_a, &self.platform_b);

        sink.emit(&format!("🏁 Comparison complete: {}", recommendation))
            .await;

        let mut report = StageReport::new("compare");
        report.succeeded = 1;
        report.insert_data("winner_platform", serde_json::json!(winner));
        report.insert_data("recommendation", serde_json::json!(recommendation));
        Ok(report)
    }

    fn name(&self) -> &str {
        "compare"
    }
}

/// Runs the two platform searches strictly one after the other (the agent
/// owns a single device) and then the comparison, assembling the verdict.
pub struct ComparisonWorkflow {
    runner: SessionRunner,
    platform_a: String,
    platform_b: String,
    query: String,
    item_type: String,
    category: TaskCategory,
}

impl ComparisonWorkflow {
    pub fn new(
        runner: SessionRunner,
        config: &WorkflowConfig,
        category: TaskCategory,
        query: String,
    ) -> Self {
        let (platform_a, platform_b) = config.platform_pair(category);
        Self {
            runner,
            platform_a: platform_a.to_string(),
            platform_b: platform_b.to_string(),
            query,
            item_type: category.item_type().to_string(),
            category,
        }
    }

    pub async fn run(&self, sink: &dyn StatusSink) -> ComparisonOutcome {
        let execution_id = format!("cmp_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S%3f"));
        let mut workflow = Workflow::new(execution_id);

        for platform in [&self.platform_a, &self.platform_b] {
            workflow.add_stage(Box::new(PlatformSearchStage {
                name: format!("search:{}", platform),
                runner: self.runner.clone(),
                platform: platform.clone(),
                query: self.query.clone(),
                item_type: self.item_type.clone(),
            }));
        }
        workflow.add_stage(Box::new(CompareStage {
            platform_a: self.platform_a.clone(),
            platform_b: self.platform_b.clone(),
        }));

        let context = workflow.execute_all(sink).await;

        let mut details = HashMap::new();
        for platform in [&self.platform_a, &self.platform_b] {
            let key = platform.to_lowercase();
            match context.session_result(platform) {
                Some(result) => {
                    details.insert(key, result.clone());
                }
                // A stage that never produced a result still shows up as a
                // failed entry in the final document.
                None => {
                    details.insert(key, SessionResult::failed(platform, ""));
                }
            }
        }

        let winner_platform = context
            .shared_data("winner_platform")
            .and_then(|v| v.as_str().map(String::from));
        let recommendation = context
            .shared_data("recommendation")
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| "No valid items found.".to_string());

        ComparisonOutcome {
            query: self.query.clone(),
            category: self.category.as_str().to_string(),
            verdict: ComparisonVerdict {
                winner_platform,
                recommendation,
                details,
            },
        }
    }
}
