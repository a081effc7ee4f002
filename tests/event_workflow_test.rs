use async_trait::async_trait;
use dealrun::app::workflows::{EventWorkflow, FixedMenuSource};
use dealrun::config::WorkflowConfig;
use dealrun::domain::model::{EventPlan, Guest, LogisticsRequest};
use dealrun::domain::ports::{AutomationAgent, PreferenceSource, StatusSink};
use dealrun::utils::error::{AgentError, Result};
use dealrun::SessionRunner;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

enum ScriptedCall {
    Respond(&'static str),
    Fault(&'static str),
}

/// Agent double that replays canned outputs and records every goal it saw.
struct ScriptedAgent {
    script: Mutex<VecDeque<ScriptedCall>>,
    goals: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    fn new(calls: Vec<ScriptedCall>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(calls.into()),
            goals: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AutomationAgent for ScriptedAgent {
    async fn run(&self, goal: &str) -> Result<String> {
        self.goals.lock().await.push(goal.to_string());
        match self.script.lock().await.pop_front() {
            Some(ScriptedCall::Respond(text)) => Ok(text.to_string()),
            Some(ScriptedCall::Fault(message)) => Err(AgentError::SessionError {
                message: message.to_string(),
            }),
            None => panic!("scripted agent ran out of responses"),
        }
    }
}

#[derive(Default)]
struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

#[async_trait]
impl StatusSink for CollectingSink {
    async fn emit(&self, line: &str) {
        self.lines.lock().await.push(line.to_string());
    }
}

struct TwoItemMenu;

#[async_trait]
impl PreferenceSource for TwoItemMenu {
    async fn collect(&self, _guests: &[Guest]) -> Result<Vec<String>> {
        Ok(vec!["Garlic Naan".to_string(), "Coke".to_string()])
    }
}

fn guest(name: &str) -> Guest {
    Guest {
        name: name.to_string(),
        phone: "+91-00000-00000".to_string(),
    }
}

fn zero_cooldown_config() -> WorkflowConfig {
    WorkflowConfig {
        invite_cooldown_secs: 0,
        ..WorkflowConfig::default()
    }
}

const ORDER_OK: &str = r#"{"title":"Garlic Naan","price":"80","rating":"4.4"}"#;

#[tokio::test]
async fn test_full_event_run_summarizes_every_stage() {
    // 2 invites + 2 orders + 1 ride booking.
    let agent = ScriptedAgent::new(vec![
        ScriptedCall::Respond("Invite sent"),
        ScriptedCall::Respond("Invite sent"),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(r#"{"title":"UberGo","price":"150","rating":"4.8"}"#),
    ]);

    let runner = SessionRunner::new(agent.clone());
    let workflow = EventWorkflow::new(runner, Arc::new(TwoItemMenu), &zero_cooldown_config());

    let plan = EventPlan {
        name: "Birthday Bash @ 8PM".to_string(),
        guests: vec![guest("Mom"), guest("Rahul")],
        logistics: vec![LogisticsRequest {
            guest_name: "Mom".to_string(),
            pickup: "Apollo Hospital".to_string(),
            drop: "Home".to_string(),
        }],
    };

    let report = workflow.run(&plan, &CollectingSink::default()).await;

    assert_eq!(report.event, "Birthday Bash @ 8PM");
    assert_eq!(report.status, "success");
    assert_eq!(report.stages.len(), 4);

    let by_name = |name: &str| report.stages.iter().find(|s| s.stage == name).unwrap();
    assert_eq!(by_name("invite").succeeded, 2);
    assert_eq!(by_name("collect-preferences").succeeded, 1);
    assert_eq!(by_name("order").succeeded, 2);
    assert_eq!(by_name("logistics").succeeded, 1);

    assert_eq!(report.summary.get("total_stages").unwrap(), 4);
    assert_eq!(report.summary.get("total_succeeded").unwrap(), 6);
    assert_eq!(report.summary.get("total_failed").unwrap(), 0);

    // Goal contracts: invites go through the messaging app, orders through
    // the configured food platform, rides through the booking platform.
    let goals = agent.goals.lock().await;
    assert_eq!(goals.len(), 5);
    assert!(goals[0].contains("Open WhatsApp."));
    assert!(goals[0].contains("Birthday Bash @ 8PM"));
    assert!(goals[2].contains("Open Swiggy."));
    assert!(goals[2].contains("Garlic Naan"));
    assert!(goals[4].contains("Open Uber."));
    assert!(goals[4].contains("ride from Apollo Hospital to Home"));
}

#[tokio::test]
async fn test_failed_invite_skips_to_next_guest() {
    let agent = ScriptedAgent::new(vec![
        ScriptedCall::Fault("contact not found"),
        ScriptedCall::Respond("Invite sent"),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
    ]);

    let runner = SessionRunner::new(agent.clone());
    let workflow = EventWorkflow::new(runner, Arc::new(TwoItemMenu), &zero_cooldown_config());

    let plan = EventPlan {
        name: "Housewarming".to_string(),
        guests: vec![guest("Unknown"), guest("Rahul")],
        logistics: Vec::new(),
    };

    let report = workflow.run(&plan, &CollectingSink::default()).await;

    let invite = report.stages.iter().find(|s| s.stage == "invite").unwrap();
    assert_eq!(invite.succeeded, 1);
    assert_eq!(invite.failed, 1);
    assert_eq!(report.status, "partial");

    // Both guests were attempted and the workflow kept going afterwards.
    let goals = agent.goals.lock().await;
    assert_eq!(goals.len(), 4);
    let order = report.stages.iter().find(|s| s.stage == "order").unwrap();
    assert_eq!(order.succeeded, 2);
}

#[tokio::test]
async fn test_failed_order_does_not_stop_remaining_orders() {
    let agent = ScriptedAgent::new(vec![
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Fault("item out of stock"),
        ScriptedCall::Respond(ORDER_OK),
    ]);

    let runner = SessionRunner::new(agent.clone());
    // No guests, no logistics: only the menu drives sessions here.
    let source = Arc::new(ThreeItemMenu);
    let workflow = EventWorkflow::new(runner, source, &zero_cooldown_config());

    let plan = EventPlan {
        name: "Quiet dinner".to_string(),
        guests: Vec::new(),
        logistics: Vec::new(),
    };

    let report = workflow.run(&plan, &CollectingSink::default()).await;

    let order = report.stages.iter().find(|s| s.stage == "order").unwrap();
    assert_eq!(order.succeeded, 2);
    assert_eq!(order.failed, 1);
    assert_eq!(agent.goals.lock().await.len(), 3);
}

struct ThreeItemMenu;

#[async_trait]
impl PreferenceSource for ThreeItemMenu {
    async fn collect(&self, _guests: &[Guest]) -> Result<Vec<String>> {
        Ok(vec![
            "Butter Chicken".to_string(),
            "Garlic Naan".to_string(),
            "Coke".to_string(),
        ])
    }
}

#[tokio::test]
async fn test_default_menu_source_orders_four_items() {
    let agent = ScriptedAgent::new(vec![
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
    ]);

    let runner = SessionRunner::new(agent.clone());
    let workflow = EventWorkflow::new(runner, Arc::new(FixedMenuSource), &zero_cooldown_config());

    let plan = EventPlan {
        name: "Team lunch".to_string(),
        guests: Vec::new(),
        logistics: Vec::new(),
    };

    let report = workflow.run(&plan, &CollectingSink::default()).await;

    let order = report.stages.iter().find(|s| s.stage == "order").unwrap();
    assert_eq!(order.succeeded, 4);
}

#[tokio::test]
async fn test_progress_lines_follow_the_stage_order() {
    let agent = ScriptedAgent::new(vec![
        ScriptedCall::Respond("Invite sent"),
        ScriptedCall::Respond(ORDER_OK),
        ScriptedCall::Respond(ORDER_OK),
    ]);

    let runner = SessionRunner::new(agent);
    let workflow = EventWorkflow::new(runner, Arc::new(TwoItemMenu), &zero_cooldown_config());

    let plan = EventPlan {
        name: "Game night".to_string(),
        guests: vec![guest("Rahul")],
        logistics: Vec::new(),
    };

    let sink = CollectingSink::default();
    workflow.run(&plan, &sink).await;

    let lines = sink.lines.lock().await;
    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("missing line: {}", needle))
    };

    assert!(position("Event coordination started") < position("Starting invitations"));
    assert!(position("Starting invitations") < position("Collecting preferences"));
    assert!(position("Collecting preferences") < position("Ordering food"));
    assert!(position("Ordering food") < position("Event setup complete"));
}
