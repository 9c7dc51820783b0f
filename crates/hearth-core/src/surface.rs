//! Seam for the render target.
//!
//! The widget chrome (DOM, test harness, anything else) implements
//! [`RenderSurface`]; the core pushes rendered messages and chrome text
//! through it and routes element events back through its dispatch.

use crate::config::WidgetConfig;
use crate::render::{dispatch, Effect, ElementEvent, RenderTree};
use serde::Serialize;

/// The chrome strings derived from the effective config. Reapplied on
/// every config refresh without rebuilding message history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromeText {
    pub bot_name: String,
    pub input_placeholder: String,
    pub send_button_text: String,
    pub theme_color: String,
}

impl ChromeText {
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            bot_name: config.bot_name().to_string(),
            input_placeholder: config.input_placeholder().to_string(),
            send_button_text: config.send_button_text().to_string(),
            theme_color: config.theme_color().to_string(),
        }
    }
}

/// A render target owning the displayed conversation.
pub trait RenderSurface: Send {
    /// Appends one rendered message to the display.
    fn push_message(&mut self, rendered: RenderTree);

    /// Updates chrome text in place (bot name, placeholder, send label).
    fn apply_chrome(&mut self, chrome: ChromeText);

    /// Routes an element event to the rendered message at `index`.
    fn dispatch(&mut self, index: usize, event: ElementEvent) -> Effect;
}

/// In-memory surface: keeps the rendered transcript as data. Used in tests
/// and by embeddings that diff the transcript themselves.
#[derive(Debug, Default)]
pub struct TranscriptSurface {
    messages: Vec<RenderTree>,
    chrome: Option<ChromeText>,
}

impl TranscriptSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[RenderTree] {
        &self.messages
    }

    pub fn chrome(&self) -> Option<&ChromeText> {
        self.chrome.as_ref()
    }
}

impl RenderSurface for TranscriptSurface {
    fn push_message(&mut self, rendered: RenderTree) {
        self.messages.push(rendered);
    }

    fn apply_chrome(&mut self, chrome: ChromeText) {
        self.chrome = Some(chrome);
    }

    fn dispatch(&mut self, index: usize, event: ElementEvent) -> Effect {
        match self.messages.get_mut(index) {
            Some(tree) => dispatch(tree, event),
            None => Effect::None,
        }
    }
}
