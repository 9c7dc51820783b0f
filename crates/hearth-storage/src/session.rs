//! Session identity and persisted conversation history.
//!
//! The session id is created once per persistence surface and never
//! changes; the history is append-only. Persistence failures are logged
//! and the in-memory history stays authoritative for the page lifetime.

use crate::kv::KeyValueStore;
use hearth_core::Message;
use std::sync::Arc;
use uuid::Uuid;

const SESSION_ID_KEY: &str = "chatbot_session_id";

fn conversation_key(session_id: &str) -> String {
    format!("chatbot_conversation_{}", session_id)
}

/// Owns the session identifier and the ordered message history.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    session_id: String,
    history: Vec<Message>,
}

impl SessionStore {
    /// Opens the session on a persistence surface: resumes the stored
    /// session if an id is present, otherwise creates and persists a new
    /// one, then loads whatever history exists for it.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let session_id = get_or_create_session_id(store.as_ref());
        let history = load_history(store.as_ref(), &session_id);
        Self {
            store,
            session_id,
            history,
        }
    }

    /// The stable session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The in-memory history, insertion order = chronological order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Appends a message and persists the full updated sequence.
    ///
    /// A persistence failure is logged as a warning and does not roll back
    /// the in-memory append.
    pub fn append(&mut self, message: Message) {
        self.history.push(message);

        let serialized = match serde_json::to_string(&self.history) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Failed to serialize conversation history: {}", err);
                return;
            }
        };
        if let Err(err) = self
            .store
            .set(&conversation_key(&self.session_id), &serialized)
        {
            log::warn!("Failed to persist conversation history: {}", err);
        }
    }
}

fn get_or_create_session_id(store: &dyn KeyValueStore) -> String {
    if let Some(existing) = store.get(SESSION_ID_KEY) {
        if !existing.trim().is_empty() {
            return existing;
        }
    }

    // UUID v4: hyphenated hex, random nibbles except the fixed
    // version/variant positions.
    let session_id = Uuid::new_v4().to_string();
    if let Err(err) = store.set(SESSION_ID_KEY, &session_id) {
        log::warn!("Failed to persist session id: {}", err);
    }
    session_id
}

/// Returns the persisted history, or an empty sequence when none exists or
/// the stored JSON is corrupt.
fn load_history(store: &dyn KeyValueStore, session_id: &str) -> Vec<Message> {
    let Some(raw) = store.get(&conversation_key(session_id)) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(history) => history,
        Err(err) => {
            log::warn!("Corrupt conversation history, starting empty: {}", err);
            Vec::new()
        }
    }
}
