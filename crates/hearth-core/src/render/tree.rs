//! The render tree: a headless, serializable description of one rendered
//! message. The embedding chrome walks this tree to build actual DOM (or
//! any other surface); the core never touches a document.

use crate::message::{ButtonAction, FaqEntry, Sender};
use crate::style::StyleMap;
use serde::Serialize;

/// The rendered form of one message: one block per populated field, in the
/// fixed field order text, buttons, image, video, carousel, custom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub sender: Sender,
    pub blocks: Vec<Block>,
}

impl RenderTree {
    /// True when nothing renderable came out of the message.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One rendered block. Interactive blocks carry their own derived state
/// (disabled flags, star selection, field values); that state is
/// recomputable from events and is not a second source of truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Text(TextBlock),
    Buttons(ButtonGroup),
    Image(ImageBlock),
    Video(VideoBlock),
    Carousel(CarouselBlock),
    Locations(LocationsBlock),
    Faq(FaqBlock),
    Table(TableBlock),
    Rating(RatingBlock),
    Form(FormBlock),
}

/// Formatted text bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    /// Output of the injected text formatter.
    pub html: String,
    pub style: StyleMap,
}

/// A set of quick-reply buttons. The whole group disables after any one
/// button is activated, preventing duplicate submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonGroup {
    pub buttons: Vec<RenderedButton>,
    pub disabled: bool,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedButton {
    pub title: String,
    pub action: ButtonAction,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub url: String,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoBlock {
    pub url: String,
    pub autoplay: bool,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselBlock {
    pub cards: Vec<RenderedCard>,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCard {
    pub image_url: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    /// Card-local button group; empty when the card carries no buttons.
    pub buttons: ButtonGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationsBlock {
    pub locations: Vec<RenderedLocation>,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLocation {
    pub title: Option<String>,
    pub address: Option<String>,
    /// External map link derived from the coordinates.
    pub map_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqBlock {
    pub entries: Vec<FaqEntry>,
    pub style: StyleMap,
    pub question_style: StyleMap,
    pub answer_style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: StyleMap,
    pub header_style: StyleMap,
    pub cell_style: StyleMap,
}

/// Star-rating prompt. Stars are laid out high-to-low but carry their
/// logical 1..=scale value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBlock {
    pub title: Option<String>,
    pub scale: u32,
    pub stars: Vec<Star>,
    pub selected: Option<u32>,
    pub disabled: bool,
    pub style: StyleMap,
    pub star_style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub value: u32,
    pub selected: bool,
}

/// Dynamic form. Disables after one successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormBlock {
    pub title: Option<String>,
    pub fields: Vec<RenderedField>,
    /// Payload prefix configured by the bot; the submission payload is this
    /// prefix concatenated with the JSON-encoded field-value map.
    pub submit_payload: String,
    pub submit_label: String,
    pub submitted: bool,
    pub style: StyleMap,
    pub field_style: StyleMap,
    pub submit_style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    /// Input kind: `text`, `select`, `textarea`, or another input type.
    pub kind: String,
    pub required: bool,
    pub options: Vec<String>,
    /// Current input value, updated through field-change events.
    pub value: String,
    /// Set when a required field blocked the last submission attempt.
    pub invalid: bool,
}
