use crate::domain::model::Guest;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Capability interface for the on-device automation agent: one
/// natural-language goal in, raw text out. No structural contract on the
/// returned text beyond "possibly JSON, possibly fenced in markdown".
#[async_trait]
pub trait AutomationAgent: Send + Sync {
    async fn run(&self, goal: &str) -> Result<String>;
}

/// Source of guest food preferences used to build an event menu.
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    async fn collect(&self, guests: &[Guest]) -> Result<Vec<String>>;
}

/// Receiver for human-readable progress lines. Delivery is best-effort;
/// implementations must never surface a send failure to the workflow.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn emit(&self, line: &str);
}
