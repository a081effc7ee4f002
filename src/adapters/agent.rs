use crate::domain::ports::AutomationAgent;
use crate::utils::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    goal: &'a str,
    model: &'a str,
    api_key: &'a str,
}

/// HTTP adapter for the device-automation service: POST the goal, read the
/// session's raw text back. The missing-credential check happens here, per
/// invocation, so a keyless process can still start up.
pub struct HttpAutomationAgent {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpAutomationAgent {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }
}

#[async_trait]
impl AutomationAgent for HttpAutomationAgent {
    async fn run(&self, goal: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::MissingCredential {
                names: "GEMINI_API_KEY or GOOGLE_API_KEY".to_string(),
            })?;

        tracing::debug!("Dispatching goal to agent at {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AgentRequest {
                goal,
                model: &self.model,
                api_key,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::SessionError {
                message: format!("agent returned {}: {}", status, body),
            });
        }

        tracing::debug!("Agent session finished ({} bytes)", body.len());
        Ok(body)
    }
}
