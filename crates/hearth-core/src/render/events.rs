//! Element events and the single dispatch function.
//!
//! Every interaction on a rendered element (button click, star selection,
//! form input, form submit) is an explicit event record routed through
//! [`dispatch`]. Dispatch mutates the derived interaction state on the
//! tree (disabled flags, selections, field values) and returns at most one
//! [`Effect`] for the caller to carry out.

use super::tree::{Block, ButtonGroup, RenderTree};
use crate::message::ButtonAction;
use serde::Serialize;
use serde_json::{Map, Value};

/// An interaction on one rendered element, addressed by block index.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    ButtonPressed {
        block: usize,
        index: usize,
    },
    CardButtonPressed {
        block: usize,
        card: usize,
        index: usize,
    },
    /// Star with logical value `rating` (1..=scale) was selected.
    StarSelected {
        block: usize,
        rating: u32,
    },
    FieldChanged {
        block: usize,
        field: String,
        value: String,
    },
    FormSubmitted {
        block: usize,
    },
}

/// What the embedding layer should do after an event was dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    /// Submit to the backend: optional user-visible echo text, optional
    /// payload.
    Submit {
        text: Option<String>,
        payload: Option<String>,
    },
    /// Open the URL externally; nothing is submitted.
    OpenUrl(String),
    /// Nothing to do (event hit a disabled, absent, or blocked element).
    None,
}

/// Dispatches one event against one rendered message.
///
/// Exactly one action results per activation; an already-disabled element
/// swallows the event. Events addressing a block of the wrong kind or out
/// of range are ignored.
pub fn dispatch(tree: &mut RenderTree, event: ElementEvent) -> Effect {
    match event {
        ElementEvent::ButtonPressed { block, index } => match tree.blocks.get_mut(block) {
            Some(Block::Buttons(group)) => activate_button(group, index),
            _ => Effect::None,
        },
        ElementEvent::CardButtonPressed { block, card, index } => {
            match tree.blocks.get_mut(block) {
                Some(Block::Carousel(carousel)) => match carousel.cards.get_mut(card) {
                    Some(card) => activate_button(&mut card.buttons, index),
                    None => Effect::None,
                },
                _ => Effect::None,
            }
        }
        ElementEvent::StarSelected { block, rating } => match tree.blocks.get_mut(block) {
            Some(Block::Rating(r)) => {
                if r.disabled || rating == 0 || rating > r.scale {
                    return Effect::None;
                }
                r.selected = Some(rating);
                r.disabled = true;
                for star in &mut r.stars {
                    star.selected = star.value <= rating;
                }
                Effect::Submit {
                    text: None,
                    payload: Some(rating_payload(rating)),
                }
            }
            _ => Effect::None,
        },
        ElementEvent::FieldChanged {
            block,
            field,
            value,
        } => {
            if let Some(Block::Form(form)) = tree.blocks.get_mut(block) {
                if form.submitted {
                    return Effect::None;
                }
                if let Some(f) = form.fields.iter_mut().find(|f| f.name == field) {
                    f.value = value;
                    f.invalid = false;
                }
            }
            Effect::None
        }
        ElementEvent::FormSubmitted { block } => match tree.blocks.get_mut(block) {
            Some(Block::Form(form)) => {
                if form.submitted {
                    return Effect::None;
                }

                // Required validation blocks the submission; the offending
                // fields are flagged for the chrome to highlight.
                let mut blocked = false;
                for field in &mut form.fields {
                    if field.required && field.value.trim().is_empty() {
                        field.invalid = true;
                        blocked = true;
                    }
                }
                if blocked {
                    return Effect::None;
                }

                form.submitted = true;

                let echo = form
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.value))
                    .collect::<Vec<_>>()
                    .join(", ");

                let mut values = Map::new();
                for field in &form.fields {
                    values.insert(field.name.clone(), Value::String(field.value.clone()));
                }
                // Prefix + JSON-encoded value map; the backend parses this
                // exact concatenation.
                let payload = format!("{}{}", form.submit_payload, Value::Object(values));

                Effect::Submit {
                    text: Some(echo),
                    payload: Some(payload),
                }
            }
            _ => Effect::None,
        },
    }
}

fn activate_button(group: &mut ButtonGroup, index: usize) -> Effect {
    if group.disabled {
        return Effect::None;
    }
    let Some(button) = group.buttons.get(index) else {
        return Effect::None;
    };

    // The whole set disables after one activation, whatever the action.
    group.disabled = true;

    match &button.action {
        ButtonAction::Payload { payload } => Effect::Submit {
            text: Some(button.title.clone()),
            payload: Some(payload.clone()),
        },
        ButtonAction::Url { url } => Effect::OpenUrl(url.clone()),
        ButtonAction::Question { question } => Effect::Submit {
            text: Some(button.title.clone()),
            payload: Some(question.clone()),
        },
    }
}

/// The rating command payload: `/rate_service{"rating":N}`.
fn rating_payload(rating: u32) -> String {
    format!("/rate_service{{\"rating\":{}}}", rating)
}
