//! Networking and orchestration for the Hearth widget: the bot backend
//! client, remote config resolution, the conversation controller, the
//! auto-refresh scheduler and the widget assembly.

pub mod backend;
pub mod config_resolver;
pub mod controller;
pub mod scheduler;
pub mod widget;

use hearth_core::RenderSurface;
use std::sync::{Arc, Mutex};

/// The render target shared between the controller (message pushes) and
/// the scheduler (chrome reapplication). Locked only for short synchronous
/// sections, never across an await.
pub type SharedSurface = Arc<Mutex<dyn RenderSurface>>;

pub use crate::backend::{BotBackend, BotRequest, CustomData, HttpBotBackend};
pub use crate::config_resolver::{ConfigHandle, ConfigResolver};
pub use crate::controller::{ConversationController, FALLBACK_BOT_MESSAGE};
pub use crate::scheduler::AutoRefreshScheduler;
pub use crate::widget::ChatWidget;
