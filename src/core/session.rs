use crate::core::parser;
use crate::domain::model::{SessionResult, SessionStatus};
use crate::domain::ports::AutomationAgent;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

const MESSAGING_APP: &str = "WhatsApp";

/// Natural-language goal handed to the automation agent. The wording is a
/// fixed contract: search and order goals must name the application, the
/// action, and the three-key JSON item shape the parser expects.
#[derive(Debug, Clone)]
pub enum Goal {
    Search {
        app: String,
        query: String,
        item_type: String,
    },
    Order {
        app: String,
        query: String,
        item_type: String,
    },
    Message {
        contact: String,
        message: String,
    },
}

impl Goal {
    pub fn render(&self) -> String {
        match self {
            Goal::Search {
                app,
                query,
                item_type,
            } => format!(
                "Open {}. Search for '{}'. Look at the search results and find the best {}s. \
                 Return a JSON list of the top 3 items with keys: title, price, rating. \
                 The output must be a valid JSON string.",
                app, query, item_type
            ),
            Goal::Order {
                app,
                query,
                item_type,
            } => format!(
                "Open {}. Search for '{}'. Pick the best {} from the results and place the order. \
                 Return the ordered item as a JSON object with keys: title, price, rating. \
                 The output must be a valid JSON string.",
                app, query, item_type
            ),
            Goal::Message { contact, message } => format!(
                "Open {}. Tap the 'New Chat' or Search icon. Search for contact '{}'. \
                 Click on the contact to open chat. Type the message: '{}'. Click Send. \
                 Return success status.",
                MESSAGING_APP, contact, message
            ),
        }
    }

    pub fn platform(&self) -> &str {
        match self {
            Goal::Search { app, .. } | Goal::Order { app, .. } => app,
            Goal::Message { .. } => MESSAGING_APP,
        }
    }
}

/// Wraps one automation-session invocation: build the goal, run the agent,
/// collect the output into a SessionResult. The device gate is the single
/// admission point for everything that touches the device; sessions are
/// serialized here no matter how many workflows are in flight.
#[derive(Clone)]
pub struct SessionRunner {
    agent: Arc<dyn AutomationAgent>,
    device_gate: Arc<Mutex<()>>,
}

impl SessionRunner {
    pub fn new(agent: Arc<dyn AutomationAgent>) -> Self {
        Self {
            agent,
            device_gate: Arc::new(Mutex::new(())),
        }
    }

    pub async fn run_search(&self, app: &str, query: &str, item_type: &str) -> SessionResult {
        self.run_listing(Goal::Search {
            app: app.to_string(),
            query: query.to_string(),
            item_type: item_type.to_string(),
        })
        .await
    }

    pub async fn run_order(&self, app: &str, query: &str, item_type: &str) -> SessionResult {
        self.run_listing(Goal::Order {
            app: app.to_string(),
            query: query.to_string(),
            item_type: item_type.to_string(),
        })
        .await
    }

    /// Send a chat message. The result carries no items; success means the
    /// agent came back without a fault.
    pub async fn run_message(&self, contact: &str, message: &str) -> SessionResult {
        let goal = Goal::Message {
            contact: contact.to_string(),
            message: message.to_string(),
        };
        match self.execute(&goal).await {
            Ok(output) => SessionResult {
                platform: MESSAGING_APP.to_string(),
                status: SessionStatus::Success,
                items: Vec::new(),
                best_item: None,
                raw_response: output,
            },
            Err(e) => {
                tracing::error!("[{}] session failed: {}", MESSAGING_APP, e);
                SessionResult::failed(MESSAGING_APP, &e.to_string())
            }
        }
    }

    async fn run_listing(&self, goal: Goal) -> SessionResult {
        let platform = goal.platform().to_string();
        match self.execute(&goal).await {
            Ok(output) => parser::parse_session_output(&platform, &output),
            // An agent fault becomes a failed result; it must never take the
            // orchestrator down.
            Err(e) => {
                tracing::error!("[{}] session failed: {}", platform, e);
                SessionResult::failed(&platform, &e.to_string())
            }
        }
    }

    async fn execute(&self, goal: &Goal) -> Result<String> {
        let _device = self.device_gate.lock().await;
        tracing::info!("[{}] running automation session", goal.platform());
        self.agent.run(&goal.render()).await
    }
}
