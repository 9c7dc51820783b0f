//! Widget assembly: the explicit context that wires config, session,
//! controller and scheduler together. No ambient globals; everything the
//! widget needs is passed in here once.

use crate::backend::BotBackend;
use crate::config_resolver::{ConfigHandle, ConfigResolver};
use crate::controller::ConversationController;
use crate::scheduler::AutoRefreshScheduler;
use crate::SharedSurface;
use hearth_core::config::WidgetConfig;
use hearth_core::{ChromeText, TextFormatter};
use hearth_storage::{KeyValueStore, SessionStore};
use std::sync::Arc;
use std::time::Duration;

/// One live widget instance.
pub struct ChatWidget {
    config: ConfigHandle,
    controller: ConversationController,
    scheduler: AutoRefreshScheduler,
}

impl ChatWidget {
    /// Initializes the widget.
    ///
    /// Parses the embed-time configuration (invalid JSON falls back to
    /// defaults), pulls the remote config once if a `configApiUrl` is set,
    /// resumes or creates the session, replays persisted history without
    /// re-persisting it, applies the chrome text, and starts the
    /// auto-refresh scheduler when enabled.
    pub async fn init(
        embed_json: Option<&str>,
        store: Arc<dyn KeyValueStore>,
        surface: SharedSurface,
        backend: Arc<dyn BotBackend>,
        formatter: Arc<dyn TextFormatter>,
    ) -> Self {
        let embed_config = embed_json
            .map(WidgetConfig::from_embed_json)
            .unwrap_or_default()
            .with_defaults();
        let config = ConfigHandle::new(embed_config);
        let resolver = ConfigResolver::new(config.clone());

        // One startup fetch of the remote layer; failure is silent beyond
        // the log, the embed-time config stays in effect.
        if config.current().config_api_url.is_some() {
            if let Err(err) = resolver.refresh().await {
                log::warn!("Initial config fetch failed: {}", err);
            }
        }

        let session = SessionStore::open(store);
        let mut controller = ConversationController::new(
            config.clone(),
            session,
            backend,
            surface.clone(),
            formatter,
        );

        let effective = config.current();
        surface
            .lock()
            .unwrap()
            .apply_chrome(ChromeText::from_config(&effective));
        controller.replay_history();

        let mut scheduler = AutoRefreshScheduler::new(resolver, surface);
        if effective.auto_refresh == Some(true) && effective.config_api_url.is_some() {
            scheduler.start(Duration::from_millis(effective.auto_refresh_interval_ms()));
        }

        Self {
            config,
            controller,
            scheduler,
        }
    }

    /// Snapshot of the effective config.
    pub fn config(&self) -> WidgetConfig {
        self.config.current()
    }

    pub fn controller_mut(&mut self) -> &mut ConversationController {
        &mut self.controller
    }

    pub fn scheduler_mut(&mut self) -> &mut AutoRefreshScheduler {
        &mut self.scheduler
    }

    /// Stops background work. Session state stays persisted.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }
}
