use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use lexdraft_docs::{schema::DocumentSchema, FormState};
use tokio::sync::Mutex;

/// One in-flight drafting session. Never persisted: form state lives and
/// dies with the session (and the process).
pub struct DraftSession {
    pub schema: DocumentSchema,
    pub state: FormState,
    /// Generation counter for drafting-assistance requests. Each request
    /// takes the next generation; a completion may store its result only
    /// while its generation is still the newest, so a slow stale response
    /// cannot overwrite a newer one.
    pub assist_seq: u64,
    pub assist_result: Option<String>,
}

/// In-memory registry of draft sessions, keyed by opaque id.
#[derive(Default)]
pub struct DraftRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<DraftSession>>>>,
}

fn new_draft_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, schema: DocumentSchema) -> (String, FormState) {
        let state = FormState::new(&schema, Utc::now().date_naive());
        let id = new_draft_id();
        let session = DraftSession {
            schema,
            state: state.clone(),
            assist_seq: 0,
            assist_result: None,
        };
        self.sessions
            .lock()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        (id, state)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<DraftSession>>> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }
}
