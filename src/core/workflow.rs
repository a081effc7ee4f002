use crate::domain::model::{SessionResult, SessionStatus};
use crate::domain::ports::StatusSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

/// Outcome of one workflow stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage_name: String,
    pub succeeded: usize,
    pub failed: usize,
    pub duration: std::time::Duration,
    pub session_results: Vec<SessionResult>,
    pub data: HashMap<String, serde_json::Value>,
}

impl StageReport {
    pub fn new(stage_name: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            succeeded: 0,
            failed: 0,
            duration: std::time::Duration::default(),
            session_results: Vec::new(),
            data: HashMap::new(),
        }
    }

    pub fn record_session(&mut self, result: SessionResult) {
        match result.status {
            SessionStatus::Success => self.succeeded += 1,
            SessionStatus::Failed => self.failed += 1,
        }
        self.session_results.push(result);
    }

    pub fn insert_data(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }
}

/// Execution context threaded through the stages of one workflow run.
/// Session results and shared data from completed stages are visible to
/// every later stage.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub execution_id: String,
    pub reports: Vec<StageReport>,
    session_results: HashMap<String, SessionResult>,
    shared_data: HashMap<String, serde_json::Value>,
}

impl WorkflowContext {
    pub fn new(execution_id: String) -> Self {
        Self {
            execution_id,
            reports: Vec::new(),
            session_results: HashMap::new(),
            shared_data: HashMap::new(),
        }
    }

    pub fn previous_report(&self) -> Option<&StageReport> {
        self.reports.last()
    }

    pub fn report_by_name(&self, name: &str) -> Option<&StageReport> {
        self.reports.iter().find(|r| r.stage_name == name)
    }

    /// Latest session result for a platform, keyed by lowercased name.
    pub fn session_result(&self, platform: &str) -> Option<&SessionResult> {
        self.session_results.get(&platform.to_lowercase())
    }

    pub fn shared_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.shared_data.get(key)
    }

    pub fn add_report(&mut self, report: StageReport) {
        for result in &report.session_results {
            self.session_results
                .insert(result.platform.to_lowercase(), result.clone());
        }
        for (key, value) in &report.data {
            self.shared_data.insert(key.clone(), value.clone());
        }
        self.reports.push(report);
    }
}

/// One stage of a workflow, run with visibility into everything that came
/// before it.
#[async_trait]
pub trait WorkflowStage: Send + Sync {
    async fn run(&self, context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport>;

    fn name(&self) -> &str;

    fn should_run(&self, _context: &WorkflowContext) -> bool {
        true
    }
}

/// Sequences workflow stages in strict declared order. A failed stage is
/// recorded and the run continues; the workflow always reaches its end so a
/// final summary can be emitted.
pub struct Workflow {
    stages: Vec<Box<dyn WorkflowStage>>,
    execution_id: String,
}

impl Workflow {
    pub fn new(execution_id: String) -> Self {
        Self {
            stages: Vec::new(),
            execution_id,
        }
    }

    pub fn add_stage(&mut self, stage: Box<dyn WorkflowStage>) {
        self.stages.push(stage);
    }

    pub async fn execute_all(&self, sink: &dyn StatusSink) -> WorkflowContext {
        let mut context = WorkflowContext::new(self.execution_id.clone());

        for stage in &self.stages {
            if !stage.should_run(&context) {
                tracing::info!("⏭️ Skipping stage: {} (condition not met)", stage.name());
                continue;
            }

            let start_time = Instant::now();
            match stage.run(&context, sink).await {
                Ok(mut report) => {
                    report.duration = start_time.elapsed();
                    tracing::info!(
                        "✅ Stage finished: {} (ok: {}, failed: {}, duration: {:?})",
                        report.stage_name,
                        report.succeeded,
                        report.failed,
                        report.duration
                    );
                    context.add_report(report);
                }
                Err(e) => {
                    tracing::error!("❌ Stage failed: {}: {}", stage.name(), e);
                    sink.emit(&format!("⚠️ Stage {} failed: {}", stage.name(), e))
                        .await;
                    let mut report = StageReport::new(stage.name());
                    report.failed = 1;
                    report.duration = start_time.elapsed();
                    context.add_report(report);
                }
            }
        }

        context
    }

    pub fn execution_summary(reports: &[StageReport]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_stages = reports.len();
        let total_succeeded: usize = reports.iter().map(|r| r.succeeded).sum();
        let total_failed: usize = reports.iter().map(|r| r.failed).sum();
        let total_duration: std::time::Duration = reports.iter().map(|r| r.duration).sum();

        summary.insert(
            "total_stages".to_string(),
            serde_json::Value::Number(total_stages.into()),
        );
        summary.insert(
            "total_succeeded".to_string(),
            serde_json::Value::Number(total_succeeded.into()),
        );
        summary.insert(
            "total_failed".to_string(),
            serde_json::Value::Number(total_failed.into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let stage_names: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| serde_json::Value::String(r.stage_name.clone()))
            .collect();
        summary.insert(
            "executed_stages".to_string(),
            serde_json::Value::Array(stage_names),
        );

        summary
    }
}

/// StatusSink for contexts without subscribers: progress lines go to the log.
pub struct LogSink;

#[async_trait]
impl StatusSink for LogSink {
    async fn emit(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AgentError;

    struct MockStage {
        name: String,
        should_run: bool,
        fails: bool,
        results: Vec<SessionResult>,
        data: Vec<(String, serde_json::Value)>,
    }

    impl MockStage {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                should_run: true,
                fails: false,
                results: Vec::new(),
                data: Vec::new(),
            }
        }

        fn with_results(mut self, results: Vec<SessionResult>) -> Self {
            self.results = results;
            self
        }

        fn with_run_condition(mut self, should_run: bool) -> Self {
            self.should_run = should_run;
            self
        }

        fn failing(mut self) -> Self {
            self.fails = true;
            self
        }

        fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
            self.data.push((key.to_string(), value));
            self
        }
    }

    #[async_trait]
    impl WorkflowStage for MockStage {
        async fn run(
            &self,
            _context: &WorkflowContext,
            _sink: &dyn StatusSink,
        ) -> Result<StageReport> {
            if self.fails {
                return Err(AgentError::SessionError {
                    message: "mock stage exploded".to_string(),
                });
            }
            let mut report = StageReport::new(&self.name);
            for result in &self.results {
                report.record_session(result.clone());
            }
            for (key, value) in &self.data {
                report.insert_data(key.clone(), value.clone());
            }
            Ok(report)
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn should_run(&self, _context: &WorkflowContext) -> bool {
            self.should_run
        }
    }

    fn success_result(platform: &str) -> SessionResult {
        SessionResult {
            platform: platform.to_string(),
            status: SessionStatus::Success,
            items: Vec::new(),
            best_item: None,
            raw_response: String::new(),
        }
    }

    #[tokio::test]
    async fn test_stages_execute_in_declared_order() {
        let mut workflow = Workflow::new("test_run".to_string());
        workflow.add_stage(Box::new(
            MockStage::new("first").with_results(vec![success_result("Amazon")]),
        ));
        workflow.add_stage(Box::new(
            MockStage::new("second").with_results(vec![success_result("Flipkart")]),
        ));

        let context = workflow.execute_all(&LogSink).await;

        assert_eq!(context.reports.len(), 2);
        assert_eq!(context.reports[0].stage_name, "first");
        assert_eq!(context.reports[1].stage_name, "second");
        assert_eq!(context.previous_report().unwrap().stage_name, "second");
        assert!(context.session_result("amazon").is_some());
        assert!(context.session_result("flipkart").is_some());
    }

    #[tokio::test]
    async fn test_failed_stage_does_not_abort_the_run() {
        let mut workflow = Workflow::new("test_run".to_string());
        workflow.add_stage(Box::new(MockStage::new("boom").failing()));
        workflow.add_stage(Box::new(
            MockStage::new("after").with_results(vec![success_result("Amazon")]),
        ));

        let context = workflow.execute_all(&LogSink).await;

        assert_eq!(context.reports.len(), 2);
        assert_eq!(context.reports[0].failed, 1);
        assert_eq!(context.reports[1].succeeded, 1);
    }

    #[tokio::test]
    async fn test_conditional_stage_is_skipped() {
        let mut workflow = Workflow::new("test_run".to_string());
        workflow.add_stage(Box::new(MockStage::new("kept")));
        workflow.add_stage(Box::new(
            MockStage::new("skipped").with_run_condition(false),
        ));

        let context = workflow.execute_all(&LogSink).await;

        assert_eq!(context.reports.len(), 1);
        assert_eq!(context.reports[0].stage_name, "kept");
    }

    #[tokio::test]
    async fn test_shared_data_flows_to_later_stages() {
        struct ReadingStage;

        #[async_trait]
        impl WorkflowStage for ReadingStage {
            async fn run(
                &self,
                context: &WorkflowContext,
                _sink: &dyn StatusSink,
            ) -> Result<StageReport> {
                let mut report = StageReport::new("reader");
                let menu = context
                    .shared_data("menu")
                    .and_then(|v| v.as_array())
                    .map(|a| a.len())
                    .unwrap_or(0);
                report.insert_data("seen_menu_len", serde_json::json!(menu));
                Ok(report)
            }

            fn name(&self) -> &str {
                "reader"
            }
        }

        let mut workflow = Workflow::new("test_run".to_string());
        workflow.add_stage(Box::new(
            MockStage::new("writer").with_data("menu", serde_json::json!(["naan", "coke"])),
        ));
        workflow.add_stage(Box::new(ReadingStage));

        let context = workflow.execute_all(&LogSink).await;
        let reader = context.report_by_name("reader").unwrap();
        assert_eq!(reader.data.get("seen_menu_len").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_execution_summary() {
        let mut first = StageReport::new("invite");
        first.succeeded = 2;
        first.failed = 1;
        first.duration = std::time::Duration::from_millis(100);

        let mut second = StageReport::new("order");
        second.succeeded = 4;
        second.duration = std::time::Duration::from_millis(200);

        let summary = Workflow::execution_summary(&[first, second]);

        assert_eq!(summary.get("total_stages").unwrap(), 2);
        assert_eq!(summary.get("total_succeeded").unwrap(), 6);
        assert_eq!(summary.get("total_failed").unwrap(), 1);
        assert_eq!(summary.get("total_duration_ms").unwrap(), 300);

        let stages = summary.get("executed_stages").unwrap().as_array().unwrap();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0], "invite");
    }
}
