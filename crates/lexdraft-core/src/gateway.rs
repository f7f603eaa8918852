use anyhow::Result;
use async_trait::async_trait;

use crate::types::ChatMessage;

/// The boundary to an external text-generation provider.
///
/// Implementations perform exactly one network round trip per call and keep
/// no conversation state between calls: `history` is supplied in full, in
/// chronological order, on every `complete_chat`. Any failure (transport,
/// provider error, malformed response) is returned as an error for the
/// caller to surface; there is no retry or backoff at this layer.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Single-shot completion of a bare prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Conversational completion: prior turns plus one new user message.
    async fn complete_chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String>;
}
