use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use lexdraft_core::{gateway::TextModel, ChatMessage};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Calls a locally-hosted Ollama model via its native chat API.
///
/// Intended for privacy-sensitive deployments where draft content must not
/// leave the local machine. Same contract as every other backend: one round
/// trip, no retry.
pub struct OllamaModel {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl OllamaModel {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs: 300,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    async fn chat(&self, messages: Vec<OllamaMessage>) -> Result<String> {
        let request_body = OllamaChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        info!(model = %self.model, base_url = %self.base_url, "calling ollama chat API");

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .context("failed to build http client")?;

        let response = client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "ollama returned non-200: {body}");
            bail!("ollama error {status}: {body}");
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .context("failed to parse ollama response")?;

        info!(output_len = parsed.message.content.len(), "ollama response received");
        Ok(parsed.message.content)
    }
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl TextModel for OllamaModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(vec![OllamaMessage {
            role: "user".into(),
            content: prompt.to_string(),
        }])
        .await
    }

    async fn complete_chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !system_prompt.is_empty() {
            messages.push(OllamaMessage {
                role: "system".into(),
                content: system_prompt.to_string(),
            });
        }
        for turn in history {
            messages.push(OllamaMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            });
        }
        messages.push(OllamaMessage {
            role: "user".into(),
            content: message.to_string(),
        });
        self.chat(messages).await
    }
}
