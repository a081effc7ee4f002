use crate::domain::model::TaskCategory;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_AGENT_ENDPOINT: &str = "http://127.0.0.1:8765/run";
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Task categories reachable from the comparison CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliTask {
    Shopping,
    Food,
}

impl From<CliTask> for TaskCategory {
    fn from(task: CliTask) -> Self {
        match task {
            CliTask::Shopping => TaskCategory::Shopping,
            CliTask::Food => TaskCategory::Food,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dealrun")]
#[command(about = "Compare deals across apps through an on-device automation agent")]
pub struct CliConfig {
    /// Type of task
    #[arg(long, value_enum, default_value = "shopping")]
    pub task: CliTask,

    /// Item to search for
    #[arg(long, required = true)]
    pub query: String,

    /// Automation agent endpoint
    #[arg(long, env = "DEALRUN_AGENT_ENDPOINT", default_value = DEFAULT_AGENT_ENDPOINT)]
    pub agent_endpoint: String,

    /// Model passed through to the agent
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("query", &self.query)?;
        validate_url("agent_endpoint", &self.agent_endpoint)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dealrun-server")]
#[command(about = "Task-queuing server that streams automation progress over WebSocket")]
pub struct ServerConfig {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Automation agent endpoint
    #[arg(long, env = "DEALRUN_AGENT_ENDPOINT", default_value = DEFAULT_AGENT_ENDPOINT)]
    pub agent_endpoint: String,

    /// Model passed through to the agent
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Path to a workflow tuning file (TOML)
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("agent_endpoint", &self.agent_endpoint)?;
        Ok(())
    }
}

/// Tunable workflow parameters, overridable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Cooldown between successive invite sessions, in seconds. Gives the
    /// messaging UI time to settle and avoids tripping anti-automation
    /// defenses.
    #[serde(default = "default_invite_cooldown_secs")]
    pub invite_cooldown_secs: u64,

    /// App used to place food orders during an event.
    #[serde(default = "default_order_platform")]
    pub order_platform: String,

    #[serde(default)]
    pub platforms: PlatformPairs,
}

/// The two apps compared for each task category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPairs {
    #[serde(default = "default_shopping_pair")]
    pub shopping: [String; 2],
    #[serde(default = "default_food_pair")]
    pub food: [String; 2],
    #[serde(default = "default_ride_pair")]
    pub ride: [String; 2],
    #[serde(default = "default_pharmacy_pair")]
    pub pharmacy: [String; 2],
}

fn default_invite_cooldown_secs() -> u64 {
    2
}

fn default_order_platform() -> String {
    "Swiggy".to_string()
}

fn pair(a: &str, b: &str) -> [String; 2] {
    [a.to_string(), b.to_string()]
}

fn default_shopping_pair() -> [String; 2] {
    pair("Amazon", "Flipkart")
}

fn default_food_pair() -> [String; 2] {
    pair("Zomato", "Swiggy")
}

fn default_ride_pair() -> [String; 2] {
    pair("Uber", "Ola")
}

fn default_pharmacy_pair() -> [String; 2] {
    pair("Apollo Pharmacy", "1mg")
}

impl Default for PlatformPairs {
    fn default() -> Self {
        Self {
            shopping: default_shopping_pair(),
            food: default_food_pair(),
            ride: default_ride_pair(),
            pharmacy: default_pharmacy_pair(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            invite_cooldown_secs: default_invite_cooldown_secs(),
            order_platform: default_order_platform(),
            platforms: PlatformPairs::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WorkflowConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn invite_cooldown(&self) -> Duration {
        Duration::from_secs(self.invite_cooldown_secs)
    }

    pub fn platform_pair(&self, category: TaskCategory) -> (&str, &str) {
        let pair = match category {
            TaskCategory::Shopping => &self.platforms.shopping,
            TaskCategory::Food => &self.platforms.food,
            TaskCategory::Ride => &self.platforms.ride,
            TaskCategory::Pharmacy => &self.platforms.pharmacy,
        };
        (&pair[0], &pair[1])
    }

    /// App used to book rides for event logistics.
    pub fn ride_booking_platform(&self) -> &str {
        &self.platforms.ride[0]
    }
}

impl Validate for WorkflowConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("order_platform", &self.order_platform)?;
        for category in [
            TaskCategory::Shopping,
            TaskCategory::Food,
            TaskCategory::Ride,
            TaskCategory::Pharmacy,
        ] {
            let (a, b) = self.platform_pair(category);
            validate_non_empty_string(&format!("platforms.{}", category), a)?;
            validate_non_empty_string(&format!("platforms.{}", category), b)?;
        }
        Ok(())
    }
}

/// Resolve the LLM provider credential from the environment. Absence is not
/// fatal here; a session that actually needs the key will fail instead.
pub fn credential_from_env() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(|v| !v.is_empty()))
}
