//! Error types for the Hearth widget core.

use thiserror::Error;

/// A shared error type for the widget core and its collaborators.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. No variant is fatal to the
/// widget; every failure degrades to a fallback message or a silent no-op.
#[derive(Error, Debug, Clone)]
pub enum HearthError {
    /// Malformed embed-time configuration JSON
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// Remote configuration endpoint unreachable or returned non-2xx
    #[error("Configuration fetch error: {message}")]
    ConfigFetch {
        status: Option<u16>,
        message: String,
    },

    /// Bot backend unreachable, returned non-2xx, or returned malformed JSON
    #[error("Backend error: {message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// Persistence surface unavailable (quota exceeded, storage disabled)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Creates a ConfigParse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse(message.into())
    }

    /// Creates a ConfigFetch error
    pub fn config_fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ConfigFetch {
            status,
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a ConfigFetch error
    pub fn is_config_fetch(&self) -> bool {
        matches!(self, Self::ConfigFetch { .. })
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Returns the HTTP status carried by fetch/backend variants, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ConfigFetch { status, .. } | Self::Backend { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for HearthError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HearthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HearthError>`.
pub type Result<T> = std::result::Result<T, HearthError>;
