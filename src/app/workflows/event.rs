use crate::config::WorkflowConfig;
use crate::core::session::SessionRunner;
use crate::core::workflow::{StageReport, Workflow, WorkflowContext, WorkflowStage};
use crate::domain::model::{EventPlan, Guest, LogisticsRequest};
use crate::domain::ports::{PreferenceSource, StatusSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Placeholder preference source. A real implementation would mine the
/// guests' chat replies; this one returns a fixed menu.
pub struct FixedMenuSource;

#[async_trait]
impl PreferenceSource for FixedMenuSource {
    async fn collect(&self, _guests: &[Guest]) -> Result<Vec<String>> {
        Ok(vec![
            "Butter Chicken".to_string(),
            "Garlic Naan".to_string(),
            "Paneer Tikka".to_string(),
            "Coke".to_string(),
        ])
    }
}

struct InviteStage {
    runner: SessionRunner,
    guests: Vec<Guest>,
    event_name: String,
    cooldown: Duration,
}

#[async_trait]
impl WorkflowStage for InviteStage {
    async fn run(&self, _context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        sink.emit("📢 Starting invitations...").await;

        let invite_msg = format!(
            "Hey! You are invited to {}. Please reply with your food preference (Veg/Non-Veg) \
             and if you need a cab pickup.",
            self.event_name
        );

        let mut report = StageReport::new("invite");
        for (index, guest) in self.guests.iter().enumerate() {
            // Cooldown between successive invites; the messaging UI needs
            // time to settle.
            if index > 0 {
                tokio::time::sleep(self.cooldown).await;
            }

            sink.emit(&format!("📨 Sending invite to {}...", guest.name))
                .await;
            let result = self.runner.run_message(&guest.name, &invite_msg).await;
            if !result.is_success() {
                tracing::warn!("Invite to {} failed, moving on", guest.name);
                sink.emit(&format!("⚠️ Invite to {} failed", guest.name))
                    .await;
            }
            report.record_session(result);
        }

        Ok(report)
    }

    fn name(&self) -> &str {
        "invite"
    }
}

struct CollectPreferencesStage {
    source: Arc<dyn PreferenceSource>,
    guests: Vec<Guest>,
}

#[async_trait]
impl WorkflowStage for CollectPreferencesStage {
    async fn run(&self, _context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        sink.emit("📋 Collecting preferences...").await;

        let menu = self.source.collect(&self.guests).await?;
        sink.emit(&format!("🍽️ Finalized menu: {}", menu.join(", ")))
            .await;

        let mut report = StageReport::new("collect-preferences");
        report.succeeded = 1;
        report.insert_data("menu", serde_json::json!(menu));
        Ok(report)
    }

    fn name(&self) -> &str {
        "collect-preferences"
    }
}

struct OrderStage {
    runner: SessionRunner,
    platform: String,
}

#[async_trait]
impl WorkflowStage for OrderStage {
    async fn run(&self, context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        let menu: Vec<String> = context
            .shared_data("menu")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default();

        sink.emit(&format!("🍔 Ordering food on {}...", self.platform))
            .await;

        let mut report = StageReport::new("order");
        for item in &menu {
            sink.emit(&format!("🛒 Ordering {}...", item)).await;
            let result = self.runner.run_order(&self.platform, item, "food").await;
            if !result.is_success() {
                tracing::warn!("Order for {} failed, moving on", item);
                sink.emit(&format!("⚠️ Order for {} failed", item)).await;
            }
            report.record_session(result);
        }

        Ok(report)
    }

    fn name(&self) -> &str {
        "order"
    }
}

struct LogisticsStage {
    runner: SessionRunner,
    requests: Vec<LogisticsRequest>,
    platform: String,
}

#[async_trait]
impl WorkflowStage for LogisticsStage {
    async fn run(&self, _context: &WorkflowContext, sink: &dyn StatusSink) -> Result<StageReport> {
        sink.emit("🚕 Coordinating transport...").await;

        let mut report = StageReport::new("logistics");
        for request in &self.requests {
            sink.emit(&format!("🚕 Booking ride for {}...", request.guest_name))
                .await;
            let trip = format!("ride from {} to {}", request.pickup, request.drop);
            let result = self.runner.run_order(&self.platform, &trip, "ride").await;
            if !result.is_success() {
                tracing::warn!("Ride booking for {} failed, moving on", request.guest_name);
                sink.emit(&format!("⚠️ Ride for {} failed", request.guest_name))
                    .await;
            }
            report.record_session(result);
        }

        Ok(report)
    }

    fn name(&self) -> &str {
        "logistics"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: String,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Final outcome of an event run, summarizing every stage. Always produced,
/// no matter how many iterations failed along the way.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub event: String,
    pub execution_id: String,
    pub status: String,
    pub stages: Vec<StageSummary>,
    pub summary: std::collections::HashMap<String, serde_json::Value>,
}

/// Coordinates an event end to end: invite guests, settle the menu, order
/// the food, arrange transport. One automation session at a time, always.
pub struct EventWorkflow {
    runner: SessionRunner,
    preferences: Arc<dyn PreferenceSource>,
    invite_cooldown: Duration,
    order_platform: String,
    ride_platform: String,
}

impl EventWorkflow {
    pub fn new(
        runner: SessionRunner,
        preferences: Arc<dyn PreferenceSource>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            runner,
            preferences,
            invite_cooldown: config.invite_cooldown(),
            order_platform: config.order_platform.clone(),
            ride_platform: config.ride_booking_platform().to_string(),
        }
    }

    pub async fn run(&self, plan: &EventPlan, sink: &dyn StatusSink) -> EventReport {
        sink.emit(&format!("🎪 Event coordination started: {}", plan.name))
            .await;

        let execution_id = format!("event_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S%3f"));
        let mut workflow = Workflow::new(execution_id.clone());

        workflow.add_stage(Box::new(InviteStage {
            runner: self.runner.clone(),
            guests: plan.guests.clone(),
            event_name: plan.name.clone(),
            cooldown: self.invite_cooldown,
        }));
        workflow.add_stage(Box::new(CollectPreferencesStage {
            source: self.preferences.clone(),
            guests: plan.guests.clone(),
        }));
        workflow.add_stage(Box::new(OrderStage {
            runner: self.runner.clone(),
            platform: self.order_platform.clone(),
        }));
        workflow.add_stage(Box::new(LogisticsStage {
            runner: self.runner.clone(),
            requests: plan.logistics.clone(),
            platform: self.ride_platform.clone(),
        }));

        let context = workflow.execute_all(sink).await;

        let stages: Vec<StageSummary> = context
            .reports
            .iter()
            .map(|report| StageSummary {
                stage: report.stage_name.clone(),
                succeeded: report.succeeded,
                failed: report.failed,
                duration_ms: report.duration.as_millis() as u64,
            })
            .collect();

        let total_failed: usize = stages.iter().map(|s| s.failed).sum();
        let status = if total_failed == 0 { "success" } else { "partial" };

        sink.emit(&format!("✅ Event setup complete: {}", plan.name))
            .await;

        EventReport {
            event: plan.name.clone(),
            execution_id,
            status: status.to_string(),
            stages,
            summary: Workflow::execution_summary(&context.reports),
        }
    }
}
