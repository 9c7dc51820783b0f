//! The message renderer: polymorphic dispatch from a [`Message`] to a
//! [`RenderTree`].
//!
//! Dispatch is over populated fields, not exclusive variants: every
//! populated field emits one block, in the fixed order text, buttons,
//! image, video, carousel, custom. A custom payload sub-dispatches in the
//! fixed order locations, faq_list, table, rating, forms, video. Absent or
//! malformed fields emit nothing.

pub mod events;
pub mod tree;

pub use events::{dispatch, Effect, ElementEvent};
pub use tree::*;

use crate::config::WidgetConfig;
use crate::format::TextFormatter;
use crate::message::{
    Button, CarouselCard, CustomPayload, FormSpec, Location, Message, RatingSpec, Sender,
    TableSpec, Video,
};
use crate::style::{self, StyleOverrides};
use std::sync::Arc;

/// Renders messages into render trees, resolving styles per element.
pub struct MessageRenderer {
    formatter: Arc<dyn TextFormatter>,
}

impl MessageRenderer {
    pub fn new(formatter: Arc<dyn TextFormatter>) -> Self {
        Self { formatter }
    }

    /// Renders one message against the effective config.
    ///
    /// Pure with respect to the message and config: rendering the same
    /// inputs twice yields equal trees, so a history replay is
    /// deterministic.
    pub fn render(&self, message: &Message, config: &WidgetConfig) -> RenderTree {
        let overrides = message.style.as_ref();
        let mut blocks = Vec::new();

        if let Some(text) = &message.text {
            let component = match message.sender {
                Sender::User => "user_text",
                Sender::Bot => "bot_text",
            };
            blocks.push(Block::Text(TextBlock {
                html: self.formatter.format(text),
                style: style::resolve(config, component, "container", overrides),
            }));
        }

        if let Some(buttons) = &message.buttons {
            if !buttons.is_empty() {
                blocks.push(Block::Buttons(button_group(
                    buttons, "buttons", config, overrides,
                )));
            }
        }

        if let Some(url) = &message.image {
            blocks.push(Block::Image(ImageBlock {
                url: url.clone(),
                style: style::resolve(config, "image", "container", overrides),
            }));
        }

        if let Some(video) = &message.video {
            blocks.push(Block::Video(video_block(video, config, overrides)));
        }

        if let Some(cards) = &message.carousel {
            if !cards.is_empty() {
                blocks.push(Block::Carousel(carousel_block(cards, config, overrides)));
            }
        }

        if let Some(custom) = &message.custom {
            // A payload-local override tree beats the message-level one for
            // custom blocks.
            let custom_overrides = custom.style.as_ref().or(overrides);
            render_custom(custom, config, custom_overrides, &mut blocks);
        }

        RenderTree {
            sender: message.sender,
            blocks,
        }
    }
}

/// Sub-dispatch over the custom payload, fixed variant order.
fn render_custom(
    custom: &CustomPayload,
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
    blocks: &mut Vec<Block>,
) {
    if let Some(locations) = &custom.locations {
        blocks.push(Block::Locations(locations_block(
            locations, config, overrides,
        )));
    }
    if let Some(entries) = &custom.faq_list {
        blocks.push(Block::Faq(FaqBlock {
            entries: entries.clone(),
            style: style::resolve(config, "faq", "container", overrides),
            question_style: style::resolve(config, "faq", "question", overrides),
            answer_style: style::resolve(config, "faq", "answer", overrides),
        }));
    }
    if let Some(table) = &custom.table {
        blocks.push(Block::Table(table_block(table, config, overrides)));
    }
    if let Some(rating) = &custom.rating {
        if let Some(block) = rating_block(rating, config, overrides) {
            blocks.push(Block::Rating(block));
        }
    }
    if let Some(form) = &custom.forms {
        blocks.push(Block::Form(form_block(form, config, overrides)));
    }
    if let Some(video) = &custom.video {
        blocks.push(Block::Video(video_block(video, config, overrides)));
    }
}

fn button_group(
    buttons: &[Button],
    component: &str,
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> ButtonGroup {
    let button_style = style::resolve(config, component, "button", overrides);
    ButtonGroup {
        buttons: buttons
            .iter()
            .map(|b| RenderedButton {
                title: b.title.clone(),
                action: b.action.clone(),
                style: button_style.clone(),
            })
            .collect(),
        disabled: false,
        style: style::resolve(config, component, "container", overrides),
    }
}

fn video_block(video: &Video, config: &WidgetConfig, overrides: Option<&StyleOverrides>) -> VideoBlock {
    VideoBlock {
        url: video.url.clone(),
        autoplay: video.autoplay.unwrap_or(false),
        style: style::resolve(config, "video", "container", overrides),
    }
}

fn carousel_block(
    cards: &[CarouselCard],
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> CarouselBlock {
    CarouselBlock {
        cards: cards
            .iter()
            .map(|card| RenderedCard {
                image_url: card.image_url.clone(),
                title: card.title.clone(),
                subtitle: card.subtitle.clone(),
                buttons: card
                    .buttons
                    .as_deref()
                    .map(|buttons| button_group(buttons, "carousel", config, overrides))
                    .unwrap_or_else(|| ButtonGroup {
                        buttons: Vec::new(),
                        disabled: false,
                        style: crate::style::StyleMap::new(),
                    }),
            })
            .collect(),
        style: style::resolve(config, "carousel", "container", overrides),
    }
}

fn locations_block(
    locations: &[Location],
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> LocationsBlock {
    LocationsBlock {
        locations: locations
            .iter()
            .map(|l| RenderedLocation {
                title: l.title.clone(),
                address: l.address.clone(),
                map_url: format!("https://www.google.com/maps?q={},{}", l.latitude, l.longitude),
            })
            .collect(),
        style: style::resolve(config, "locations", "container", overrides),
    }
}

fn table_block(
    table: &TableSpec,
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> TableBlock {
    TableBlock {
        headers: table.headers.clone(),
        rows: table.rows.clone(),
        style: style::resolve(config, "table", "container", overrides),
        header_style: style::resolve(config, "table", "header", overrides),
        cell_style: style::resolve(config, "table", "cell", overrides),
    }
}

/// A rating with a zero scale is malformed and renders nothing.
fn rating_block(
    rating: &RatingSpec,
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> Option<RatingBlock> {
    if rating.scale == 0 {
        return None;
    }
    Some(RatingBlock {
        title: rating.title.clone(),
        scale: rating.scale,
        // High-to-low layout order; each star keeps its logical value.
        stars: (1..=rating.scale)
            .rev()
            .map(|value| Star {
                value,
                selected: false,
            })
            .collect(),
        selected: None,
        disabled: false,
        style: style::resolve(config, "rating", "container", overrides),
        star_style: style::resolve(config, "rating", "star", overrides),
    })
}

fn form_block(
    form: &FormSpec,
    config: &WidgetConfig,
    overrides: Option<&StyleOverrides>,
) -> FormBlock {
    FormBlock {
        title: form.title.clone(),
        fields: form
            .fields
            .iter()
            .map(|f| RenderedField {
                name: f.name.clone(),
                label: f.label.clone().unwrap_or_else(|| f.name.clone()),
                kind: f.kind.clone(),
                required: f.required,
                options: f.options.clone(),
                value: String::new(),
                invalid: false,
            })
            .collect(),
        submit_payload: form.submit_payload.clone(),
        submit_label: form
            .submit_button_text
            .clone()
            .unwrap_or_else(|| "Submit".to_string()),
        submitted: false,
        style: style::resolve(config, "form", "container", overrides),
        field_style: style::resolve(config, "form", "field", overrides),
        submit_style: style::resolve(config, "form", "submit", overrides),
    }
}
