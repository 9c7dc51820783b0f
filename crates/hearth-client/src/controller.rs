//! The conversation controller: the send/receive cycle.
//!
//! Outgoing user messages display and persist optimistically before the
//! backend round trip; replies render in server order; every failure shape
//! collapses to one fixed apology message. The user is never shown a raw
//! error and can always keep typing.

use crate::backend::{BotBackend, BotRequest};
use crate::config_resolver::ConfigHandle;
use crate::SharedSurface;
use hearth_core::{
    Effect, ElementEvent, Message, MessageRenderer, Sender, TextFormatter,
};
use hearth_storage::SessionStore;
use std::sync::Arc;

/// Fixed apology shown for any backend failure or empty response.
pub const FALLBACK_BOT_MESSAGE: &str =
    "Sorry, I'm having trouble responding right now. Please try again later.";

/// Orchestrates SessionStore, MessageRenderer and the bot backend.
pub struct ConversationController {
    config: ConfigHandle,
    renderer: MessageRenderer,
    session: SessionStore,
    backend: Arc<dyn BotBackend>,
    surface: SharedSurface,
}

impl ConversationController {
    pub fn new(
        config: ConfigHandle,
        session: SessionStore,
        backend: Arc<dyn BotBackend>,
        surface: SharedSurface,
        formatter: Arc<dyn TextFormatter>,
    ) -> Self {
        Self {
            config,
            renderer: MessageRenderer::new(formatter),
            session,
            backend,
            surface,
        }
    }

    /// The stable session identifier.
    pub fn session_id(&self) -> &str {
        self.session.session_id()
    }

    /// Renders a message to the surface; persists it first when `save` is
    /// set. History replay passes `save = false` so a reload never
    /// re-persists what it is re-rendering.
    pub fn display_message(&mut self, message: &Message, save: bool) {
        let tree = self.renderer.render(message, &self.config.current());
        if save {
            self.session.append(message.clone());
        }
        self.surface.lock().unwrap().push_message(tree);
    }

    /// Re-renders the persisted history in order, without re-persisting.
    pub fn replay_history(&mut self) {
        let history: Vec<Message> = self.session.history().to_vec();
        for message in &history {
            self.display_message(message, false);
        }
    }

    /// Sends one user turn to the backend.
    ///
    /// No-op when both `text` and `payload` are empty. The user message
    /// displays and persists before the request goes out; a payload-only
    /// send (button, rating, form) produces no user bubble.
    pub async fn send(&mut self, text: Option<&str>, payload: Option<&str>) {
        let text = text.unwrap_or("").trim();
        let payload = payload.unwrap_or("");
        if text.is_empty() && payload.is_empty() {
            return;
        }

        if !text.is_empty() {
            let user_message = Message::user(text);
            self.display_message(&user_message, true);
        }

        let config = self.config.current();
        let bot_url = config.bot_url.as_deref().unwrap_or_default().to_string();

        let mut request = BotRequest::new(self.session.session_id(), text);
        if !payload.is_empty() {
            request = request.with_payload(payload);
        }

        match self.backend.send_message(&bot_url, &request).await {
            Ok(replies) if !replies.is_empty() => {
                for reply in replies {
                    let message = reply.stamped(Sender::Bot);
                    self.display_message(&message, true);
                }
            }
            Ok(_) => {
                log::debug!("Backend returned an empty response list");
                self.display_fallback();
            }
            Err(err) => {
                log::error!("Bot backend request failed: {}", err);
                self.display_fallback();
            }
        }
    }

    /// Routes an element event through the surface's dispatch and carries
    /// out the resulting effect. Returns a URL the embedding layer should
    /// open externally, if any.
    pub async fn handle_element_event(
        &mut self,
        message_index: usize,
        event: ElementEvent,
    ) -> Option<String> {
        let effect = self.surface.lock().unwrap().dispatch(message_index, event);
        match effect {
            Effect::Submit { text, payload } => {
                self.send(text.as_deref(), payload.as_deref()).await;
                None
            }
            Effect::OpenUrl(url) => Some(url),
            Effect::None => None,
        }
    }

    fn display_fallback(&mut self) {
        let message = Message::bot_text(FALLBACK_BOT_MESSAGE);
        self.display_message(&message, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::config::WidgetConfig;
    use hearth_core::render::Block;
    use hearth_core::{HearthError, PlainTextFormatter, Result, TranscriptSurface};
    use hearth_storage::{KeyValueStore, MemoryStore};
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted backend that records every request it receives.
    struct MockBackend {
        requests: Mutex<Vec<BotRequest>>,
        responses: Mutex<Vec<Result<Vec<Message>>>>,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(Vec::new()),
            }
        }

        fn push_response(&self, response: Result<Vec<Message>>) {
            self.responses.lock().unwrap().push(response);
        }

        fn requests(&self) -> Vec<BotRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl BotBackend for MockBackend {
        async fn send_message(
            &self,
            _bot_url: &str,
            request: &BotRequest,
        ) -> Result<Vec<Message>> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    struct Harness {
        controller: ConversationController,
        backend: Arc<MockBackend>,
        transcript: Arc<Mutex<TranscriptSurface>>,
        store: Arc<MemoryStore>,
    }

    fn harness() -> Harness {
        harness_with_store(Arc::new(MemoryStore::new()))
    }

    fn harness_with_store(store: Arc<MemoryStore>) -> Harness {
        let backend = Arc::new(MockBackend::new());
        let transcript = Arc::new(Mutex::new(TranscriptSurface::new()));
        let surface: SharedSurface = transcript.clone();
        let config = ConfigHandle::new(WidgetConfig::default().with_defaults());
        let session = SessionStore::open(store.clone());
        let controller = ConversationController::new(
            config,
            session,
            backend.clone(),
            surface,
            Arc::new(PlainTextFormatter),
        );
        Harness {
            controller,
            backend,
            transcript,
            store,
        }
    }

    fn persisted_len(store: &MemoryStore, session_id: &str) -> usize {
        let raw = store
            .get(&format!("chatbot_conversation_{}", session_id))
            .unwrap_or_else(|| "[]".to_string());
        let history: Vec<Message> = serde_json::from_str(&raw).unwrap();
        history.len()
    }

    fn surface_len(transcript: &Arc<Mutex<TranscriptSurface>>) -> usize {
        transcript.lock().unwrap().messages().len()
    }

    #[tokio::test]
    async fn test_send_displays_and_persists_user_then_replies() {
        let mut h = harness();
        h.backend.push_response(Ok(vec![
            serde_json::from_value(json!({"text": "first"})).unwrap(),
            serde_json::from_value(json!({"text": "second"})).unwrap(),
        ]));

        h.controller.send(Some("hello"), None).await;

        let requests = h.backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "hello");

        // user message + two bot replies, in server order
        assert_eq!(surface_len(&h.transcript), 3);
        let session_id = h.controller.session_id().to_string();
        assert_eq!(persisted_len(&h.store, &session_id), 3);
    }

    #[tokio::test]
    async fn test_send_empty_is_noop() {
        let mut h = harness();

        h.controller.send(None, None).await;
        h.controller.send(Some("   "), Some("")).await;

        assert!(h.backend.requests().is_empty());
        assert_eq!(surface_len(&h.transcript), 0);
    }

    #[tokio::test]
    async fn test_backend_error_yields_exactly_one_fallback() {
        let mut h = harness();
        let error = HearthError::backend(Some(500), "boom");
        assert!(error.is_backend());
        h.backend.push_response(Err(error));

        h.controller.send(Some("hello"), None).await;

        // user message + one apology
        assert_eq!(surface_len(&h.transcript), 2);
        let session_id = h.controller.session_id().to_string();
        let raw = h
            .store
            .get(&format!("chatbot_conversation_{}", session_id))
            .unwrap();
        let history: Vec<Message> = serde_json::from_str(&raw).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].sender, Sender::Bot);
        assert_eq!(history[1].text.as_deref(), Some(FALLBACK_BOT_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_response_list_yields_fallback() {
        let mut h = harness();
        h.backend.push_response(Ok(Vec::new()));

        h.controller.send(Some("hello"), None).await;

        assert_eq!(surface_len(&h.transcript), 2);
    }

    #[tokio::test]
    async fn test_replay_does_not_grow_persisted_history() {
        let store = Arc::new(MemoryStore::new());

        // First page load: two turns get persisted.
        {
            let mut h = harness_with_store(store.clone());
            h.backend
                .push_response(Ok(vec![
                    serde_json::from_value(json!({"text": "hi there"})).unwrap(),
                ]));
            h.controller.send(Some("hello"), None).await;
        }

        // Reload: replay renders the history but must not re-persist it.
        let mut h = harness_with_store(store.clone());
        let session_id = h.controller.session_id().to_string();
        let before = persisted_len(&store, &session_id);

        h.controller.replay_history();

        assert_eq!(surface_len(&h.transcript), before);
        assert_eq!(persisted_len(&store, &session_id), before);
    }

    #[tokio::test]
    async fn test_rating_selection_submits_one_payload() {
        let mut h = harness();

        // Bot message carrying a rating prompt arrives.
        h.backend.push_response(Ok(vec![
            serde_json::from_value(json!({"custom": {"rating": {"scale": 5}}})).unwrap(),
        ]));
        h.controller.send(Some("rate"), None).await;

        // User selects star 3 on the bot message (index 1 on the surface).
        let opened = h
            .controller
            .handle_element_event(1, ElementEvent::StarSelected { block: 0, rating: 3 })
            .await;
        assert!(opened.is_none());

        let requests = h.backend.requests();
        assert_eq!(requests.len(), 2);
        let rating_request = &requests[1];
        assert_eq!(
            rating_request.custom_data.as_ref().unwrap().payload,
            "/rate_service{\"rating\":3}"
        );

        // Stars 1..=3 selected, 4..=5 not.
        let transcript = h.transcript.lock().unwrap();
        let Block::Rating(rating) = &transcript.messages()[1].blocks[0] else {
            panic!("expected rating block");
        };
        for star in &rating.stars {
            assert_eq!(star.selected, star.value <= 3);
        }
    }

    #[tokio::test]
    async fn test_required_form_field_blocks_submission() {
        let mut h = harness();
        h.backend.push_response(Ok(vec![
            serde_json::from_value(json!({
                "custom": {"forms": {
                    "fields": [{"name": "email", "required": true}],
                    "submit_payload": "/submit_form"
                }}
            }))
            .unwrap(),
        ]));
        h.controller.send(Some("form please"), None).await;
        let before = h.backend.requests().len();

        h.controller
            .handle_element_event(1, ElementEvent::FormSubmitted { block: 0 })
            .await;

        // Blocked: nothing was sent.
        assert_eq!(h.backend.requests().len(), before);
    }

    #[tokio::test]
    async fn test_url_button_returns_url_without_sending() {
        let mut h = harness();
        h.backend.push_response(Ok(vec![
            serde_json::from_value(json!({
                "buttons": [{"title": "Docs", "url": "https://example.com"}]
            }))
            .unwrap(),
        ]));
        h.controller.send(Some("links"), None).await;
        let before = h.backend.requests().len();

        let opened = h
            .controller
            .handle_element_event(1, ElementEvent::ButtonPressed { block: 0, index: 0 })
            .await;

        assert_eq!(opened.as_deref(), Some("https://example.com"));
        assert_eq!(h.backend.requests().len(), before);
    }
}
