//! Conversation message types.
//!
//! A [`Message`] is one conversational turn. The variant fields are not
//! mutually exclusive: a single bot message may carry text, buttons, an
//! image and a custom payload at the same time, and the renderer emits one
//! block per populated field.

use crate::style::StyleOverrides;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed (or triggered) by the visitor.
    User,
    /// Message produced by the bot backend. Backend responses omit the
    /// sender on the wire, so this is the deserialization default.
    #[default]
    Bot,
}

/// One conversational turn, either user- or bot-authored.
///
/// Structured fields use lenient deserialization: a malformed field is
/// dropped (renders nothing) instead of failing the whole message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Message {
    #[serde(default)]
    pub sender: Sender,
    /// Creation time, ISO 8601. Set on construction, survives persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Markdown-lite text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub buttons: Option<Vec<Button>>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub video: Option<Video>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub carousel: Option<Vec<CarouselCard>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub custom: Option<CustomPayload>,
    /// Per-message style override tree, mirroring the component/element
    /// namespace used by the style resolver.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub style: Option<StyleOverrides>,
}

impl Message {
    /// Creates a user message carrying plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            timestamp: Some(now_iso8601()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a bot message carrying plain text.
    pub fn bot_text(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            timestamp: Some(now_iso8601()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Stamps the sender and a timestamp on a message that came off the
    /// wire without them (backend responses carry neither).
    pub fn stamped(mut self, sender: Sender) -> Self {
        self.sender = sender;
        if self.timestamp.is_none() {
            self.timestamp = Some(now_iso8601());
        }
        self
    }

    /// True when no renderable field is populated.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.buttons.is_none()
            && self.image.is_none()
            && self.video.is_none()
            && self.carousel.is_none()
            && self.custom.is_none()
    }
}

fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// A quick-reply button attached to a message or carousel card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    #[serde(flatten)]
    pub action: ButtonAction,
}

/// The single action a button carries. On the wire the variants are flat
/// sibling keys of `title`; a button carries exactly one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonAction {
    /// Submit the payload verbatim to the backend.
    Payload { payload: String },
    /// Open the URL externally; nothing is submitted.
    Url { url: String },
    /// Submit the question text as the payload.
    Question { question: String },
}

/// Embedded video attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
}

/// One card in a horizontally scrolled carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

/// Extension content a bot message may carry beyond the plain variants.
///
/// Each field is independent; the renderer walks them in a fixed order
/// (locations, faq_list, table, rating, forms, video).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CustomPayload {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub locations: Option<Vec<Location>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub faq_list: Option<Vec<FaqEntry>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub table: Option<TableSpec>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub rating: Option<RatingSpec>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub forms: Option<FormSpec>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub video: Option<Video>,
    /// Style override tree scoped to this payload; takes precedence over
    /// the enclosing message's override tree for custom blocks.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub style: Option<StyleOverrides>,
}

impl CustomPayload {
    /// True when no variant key is populated.
    pub fn is_empty(&self) -> bool {
        self.locations.is_none()
            && self.faq_list.is_none()
            && self.table.is_none()
            && self.rating.is_none()
            && self.forms.is_none()
            && self.video.is_none()
    }
}

/// A geographic point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One question/answer pair in an FAQ list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Tabular data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A star-rating prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSpec {
    pub scale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A dynamic form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub fields: Vec<FormField>,
    /// Prefix concatenated with the JSON-encoded field-value mapping to
    /// form the submission payload. The backend parses this exact shape;
    /// do not change the encoding.
    pub submit_payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button_text: Option<String>,
}

/// One input in a dynamic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Input kind: `text`, `select`, `textarea`, or any other HTML input
    /// type string (rendered as a typed input).
    #[serde(rename = "type", default = "default_field_kind")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

fn default_field_kind() -> String {
    "text".to_string()
}

/// Deserializes a structured field, mapping any shape mismatch to `None`
/// instead of an error. A malformed field renders nothing; it must never
/// take the whole message down with it.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
