//! Persistence layer for the Hearth widget: the key/value surface trait,
//! in-memory and file-backed implementations, and the session store.

pub mod kv;
pub mod session;

pub use crate::kv::{FileStore, KeyValueStore, MemoryStore};
pub use crate::session::SessionStore;
