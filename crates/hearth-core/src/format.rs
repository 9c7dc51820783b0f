//! Seam for the inline text formatter.
//!
//! The markdown-lite formatter itself lives with the widget chrome; the
//! core only defines the interface and a passthrough implementation.

/// Turns raw message text into display markup.
pub trait TextFormatter: Send + Sync {
    fn format(&self, raw: &str) -> String;
}

/// Passthrough formatter: emits the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl TextFormatter for PlainTextFormatter {
    fn format(&self, raw: &str) -> String {
        raw.to_string()
    }
}
