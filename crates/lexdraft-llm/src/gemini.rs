use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use lexdraft_core::{gateway::TextModel, ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Calls the Google Generative Language (`generateContent`) REST API.
///
/// One request per call, full history supplied every time, no retry: a
/// failed round trip surfaces as an error for the caller to report.
pub struct GeminiModel {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GeminiModel {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs: 120,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini names the assistant role "model"; map our roles accordingly.
fn wire_role(role: ChatRole) -> String {
    match role {
        ChatRole::User => "user".to_string(),
        ChatRole::Assistant => "model".to_string(),
    }
}

/// Assemble the request body: prior turns in chronological order, the new
/// message last. Kept separate from transport so ordering is testable.
fn build_request(
    system_prompt: &str,
    history: &[ChatMessage],
    message: &str,
) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = history
        .iter()
        .map(|turn| GeminiContent {
            role: wire_role(turn.role),
            parts: vec![GeminiPart {
                text: turn.content.clone(),
            }],
        })
        .collect();
    contents.push(GeminiContent {
        role: "user".to_string(),
        parts: vec![GeminiPart {
            text: message.to_string(),
        }],
    });
    GeminiRequest {
        system_instruction: if system_prompt.is_empty() {
            None
        } else {
            Some(SystemInstruction {
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            })
        },
        contents,
        generation_config: GenerationConfig::default(),
    }
}

impl GeminiModel {
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key,
        );

        info!(model = %self.model, turns = request.contents.len(), "calling gemini generateContent");

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .context("failed to build http client")?;

        let response = client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "gemini returned non-200: {body}");
            bail!("gemini error {status}: {body}");
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .context("failed to parse gemini response")?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            bail!("gemini returned no candidates");
        }

        info!(output_len = text.len(), "gemini response received");
        Ok(text)
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = build_request("", &[], prompt);
        self.generate(&request).await
    }

    async fn complete_chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String> {
        let request = build_request(system_prompt, history, message);
        self.generate(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn history_stays_chronological_and_new_message_is_last() {
        let now = Utc::now();
        let history = vec![
            ChatMessage::user("first question", now),
            ChatMessage::assistant("first answer", now),
            ChatMessage::user("second question", now),
            ChatMessage::assistant("second answer", now),
        ];
        let request = build_request("system", &history, "third question");

        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user", "model", "user"]);

        let texts: Vec<&str> = request
            .contents
            .iter()
            .map(|c| c.parts[0].text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "first question",
                "first answer",
                "second question",
                "second answer",
                "third question",
            ]
        );
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let request = build_request("", &[], "hello");
        assert!(request.system_instruction.is_none());
        assert_eq!(request.contents.len(), 1);
    }
}
