use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    db::Db,
    types::{ChatMessage, SessionContext},
};

/// Conversation store keyed by user id.
///
/// Reads go straight to the database. Writes for the same user are
/// serialized through a per-user async mutex so at most one persist is in
/// flight per user at a time; a second call for the same user waits for the
/// first to finish rather than racing it. Calls for different users remain
/// concurrent.
pub struct ChatSessionStore {
    db: Arc<Db>,
    /// Per-user write locks. Key = user id.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatSessionStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self {
            db,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// The stored conversation, oldest first. Empty if none exists.
    pub fn load(&self, ctx: &SessionContext) -> Result<Vec<ChatMessage>> {
        self.db.get_conversation(&ctx.user_id)
    }

    /// Append `new_messages` to the stored sequence and persist the whole
    /// sequence in one transaction.
    pub async fn append_and_persist(
        &self,
        ctx: &SessionContext,
        new_messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatMessage>> {
        let lock = self.user_lock(&ctx.user_id).await;
        let _guard = lock.lock().await;

        let mut messages = self.db.get_conversation(&ctx.user_id)?;
        messages.extend(new_messages);
        self.db.replace_conversation(&ctx.user_id, &messages)?;
        debug!(user_id = %ctx.user_id, total = messages.len(), "conversation persisted");
        Ok(messages)
    }

    /// Replace the stored sequence wholesale with the client's copy.
    pub async fn replace(&self, ctx: &SessionContext, messages: &[ChatMessage]) -> Result<()> {
        let lock = self.user_lock(&ctx.user_id).await;
        let _guard = lock.lock().await;
        self.db.replace_conversation(&ctx.user_id, messages)
    }

    /// Drop the entire stored conversation for this user.
    pub async fn clear(&self, ctx: &SessionContext) -> Result<()> {
        let lock = self.user_lock(&ctx.user_id).await;
        let _guard = lock.lock().await;
        self.db.clear_conversation(&ctx.user_id)?;
        debug!(user_id = %ctx.user_id, "conversation cleared");
        Ok(())
    }
}
