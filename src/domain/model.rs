use crate::utils::error::{AgentError, Result};
use crate::utils::validation::validate_required_field;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One comparable candidate (product, ride, medicine) extracted from a
/// session's output. `numeric_price` falls back to infinity and
/// `numeric_rating` to zero when extraction fails, so unparsable entries
/// sort last and never win a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub numeric_price: f64,
    pub numeric_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Success,
    Failed,
}

/// Outcome of a single automation session. Immutable once built; owned by
/// whichever caller invoked the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub platform: String,
    pub status: SessionStatus,
    pub items: Vec<Item>,
    pub best_item: Option<Item>,
    pub raw_response: String,
}

impl SessionResult {
    pub fn failed(platform: &str, raw_response: &str) -> Self {
        Self {
            platform: platform.to_string(),
            status: SessionStatus::Failed,
            items: Vec::new(),
            best_item: None,
            raw_response: raw_response.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SessionStatus::Success
    }
}

/// Cross-platform decision, keyed by lowercased platform name in `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    pub winner_platform: Option<String>,
    pub recommendation: String,
    pub details: HashMap<String, SessionResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsRequest {
    pub guest_name: String,
    pub pickup: String,
    pub drop: String,
}

/// Parameters for one coordinated event run. Transient workflow input,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPlan {
    pub name: String,
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub logistics: Vec<LogisticsRequest>,
}

/// Task category, mapped to a platform pair by the workflow config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Shopping,
    Food,
    Ride,
    Pharmacy,
}

impl TaskCategory {
    /// Label used in goal templates ("find the best {item_type}s").
    pub fn item_type(&self) -> &'static str {
        match self {
            TaskCategory::Shopping => "product",
            TaskCategory::Food => "food",
            TaskCategory::Ride => "ride",
            TaskCategory::Pharmacy => "medicine",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Shopping => "shopping",
            TaskCategory::Food => "food",
            TaskCategory::Ride => "ride",
            TaskCategory::Pharmacy => "pharmacy",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat POST body accepted by the task endpoint. Only the fields relevant
/// to the given persona are expected to be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    pub persona: String,
    pub product: Option<String>,
    pub pickup: Option<String>,
    pub drop: Option<String>,
    pub medicine: Option<String>,
    pub event_name: Option<String>,
    #[serde(default)]
    pub guest_list: Vec<Guest>,
}

/// Validated task request, one variant per persona, each carrying only the
/// fields it needs.
#[derive(Debug, Clone)]
pub enum TaskRequest {
    Shopper { product: String },
    Rider { pickup: String, drop: String },
    Patient { medicine: String },
    Coordinator { event_name: String, guests: Vec<Guest> },
}

impl TaskRequest {
    pub fn persona_label(&self) -> &'static str {
        match self {
            TaskRequest::Shopper { .. } => "shopper",
            TaskRequest::Rider { .. } => "rider",
            TaskRequest::Patient { .. } => "patient",
            TaskRequest::Coordinator { .. } => "coordinator",
        }
    }
}

impl TryFrom<TaskPayload> for TaskRequest {
    type Error = AgentError;

    fn try_from(payload: TaskPayload) -> Result<Self> {
        match payload.persona.as_str() {
            "shopper" => Ok(TaskRequest::Shopper {
                product: validate_required_field("product", &payload.product)?.clone(),
            }),
            "rider" => Ok(TaskRequest::Rider {
                pickup: validate_required_field("pickup", &payload.pickup)?.clone(),
                drop: validate_required_field("drop", &payload.drop)?.clone(),
            }),
            "patient" => Ok(TaskRequest::Patient {
                medicine: validate_required_field("medicine", &payload.medicine)?.clone(),
            }),
            "coordinator" => Ok(TaskRequest::Coordinator {
                event_name: validate_required_field("event_name", &payload.event_name)?.clone(),
                guests: payload.guest_list,
            }),
            other => Err(AgentError::InvalidFieldValue {
                field: "persona".to_string(),
                value: other.to_string(),
                reason: "expected one of: shopper, rider, patient, coordinator".to_string(),
            }),
        }
    }
}
