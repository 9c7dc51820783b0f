//! Hearth widget core: structured-message rendering with layered style
//! resolution.
//!
//! This crate is the I/O-free heart of the widget: message and config data
//! model, the deterministic config merge, three-tier style resolution, the
//! message renderer, and element-event dispatch. Persistence lives in
//! `hearth-storage`; networking and orchestration live in `hearth-client`.

pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod render;
pub mod style;
pub mod surface;

pub use config::{Position, WidgetConfig};
pub use error::{HearthError, Result};
pub use format::{PlainTextFormatter, TextFormatter};
pub use message::{Message, Sender};
pub use render::{Effect, ElementEvent, MessageRenderer, RenderTree};
pub use surface::{ChromeText, RenderSurface, TranscriptSurface};
