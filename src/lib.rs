pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::HttpAutomationAgent;
pub use config::{CliConfig, ServerConfig, WorkflowConfig};
pub use core::session::SessionRunner;
pub use domain::model::{ComparisonVerdict, Item, SessionResult, SessionStatus};
pub use utils::error::{AgentError, Result};
