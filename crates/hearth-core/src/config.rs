//! Widget configuration: the embed-time / remote / runtime layers and the
//! deterministic merge that produces the effective config.
//!
//! Top-level keys merge last-writer-wins. The `style` and `features`
//! sections merge key-by-key one level deep, so a remote config can restyle
//! one component without clobbering the embedder's other choices.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_BOT_URL: &str = "http://localhost:5005/webhooks/rest/webhook";
pub const DEFAULT_THEME_COLOR: &str = "#4a90e2";
pub const DEFAULT_BOT_NAME: &str = "Assistant";
pub const DEFAULT_INPUT_PLACEHOLDER: &str = "Type a message...";
pub const DEFAULT_SEND_BUTTON_TEXT: &str = "Send";
pub const DEFAULT_AUTO_REFRESH_INTERVAL_MS: u64 = 30_000;

/// Corner placement of the widget bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// One configuration layer, or the merged effective configuration.
///
/// Recognized keys are typed; `style` and `features` are carried as JSON
/// maps (their inner shape belongs to the style resolver and the embedder
/// respectively); any unrecognized top-level key survives in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh: Option<bool>,
    /// Refresh period in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh_interval: Option<u64>,
    /// Style tree: global `messages` section, per-component overrides under
    /// `components`, plus chrome sections (header, bubble, animation).
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
    /// Opaque feature flags, passed through untouched.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub features: Map<String, Value>,
    /// Unrecognized top-level keys, preserved across merges.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetConfig {
    /// Parses the embed-time configuration attribute.
    ///
    /// Invalid JSON is logged and ignored: the widget falls back to
    /// defaults plus whatever the remote config later supplies.
    pub fn from_embed_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Invalid embed configuration JSON, ignoring: {}", err);
                Self::default()
            }
        }
    }

    /// Merges `overlay` on top of `base` into a new config.
    ///
    /// Every top-level key present in the overlay overwrites the base,
    /// except `style` and `features`, which merge key-by-key one level
    /// deep (overlay keys win, base keys absent from the overlay survive).
    /// Merging the same overlay twice is idempotent.
    pub fn merge(base: &WidgetConfig, overlay: &WidgetConfig) -> WidgetConfig {
        let mut merged = base.clone();

        overwrite(&mut merged.bot_url, &overlay.bot_url);
        overwrite(&mut merged.theme_color, &overlay.theme_color);
        overwrite(&mut merged.position, &overlay.position);
        overwrite(&mut merged.bot_name, &overlay.bot_name);
        overwrite(&mut merged.input_placeholder, &overlay.input_placeholder);
        overwrite(&mut merged.send_button_text, &overlay.send_button_text);
        overwrite(&mut merged.config_api_url, &overlay.config_api_url);
        overwrite(&mut merged.auto_refresh, &overlay.auto_refresh);
        overwrite(
            &mut merged.auto_refresh_interval,
            &overlay.auto_refresh_interval,
        );

        merge_section(&mut merged.style, &overlay.style);
        merge_section(&mut merged.features, &overlay.features);

        for (key, value) in &overlay.extra {
            merged.extra.insert(key.clone(), value.clone());
        }

        merged
    }

    /// Fills defaults for recognized keys still unset after all merges.
    pub fn with_defaults(mut self) -> Self {
        self.bot_url.get_or_insert_with(|| DEFAULT_BOT_URL.into());
        self.theme_color
            .get_or_insert_with(|| DEFAULT_THEME_COLOR.into());
        self.position.get_or_insert(Position::default());
        self.bot_name.get_or_insert_with(|| DEFAULT_BOT_NAME.into());
        self.input_placeholder
            .get_or_insert_with(|| DEFAULT_INPUT_PLACEHOLDER.into());
        self.send_button_text
            .get_or_insert_with(|| DEFAULT_SEND_BUTTON_TEXT.into());
        self
    }

    /// Bot display name, falling back to the default.
    pub fn bot_name(&self) -> &str {
        self.bot_name.as_deref().unwrap_or(DEFAULT_BOT_NAME)
    }

    /// Input placeholder text, falling back to the default.
    pub fn input_placeholder(&self) -> &str {
        self.input_placeholder
            .as_deref()
            .unwrap_or(DEFAULT_INPUT_PLACEHOLDER)
    }

    /// Send button label, falling back to the default.
    pub fn send_button_text(&self) -> &str {
        self.send_button_text
            .as_deref()
            .unwrap_or(DEFAULT_SEND_BUTTON_TEXT)
    }

    /// Theme color, falling back to the default.
    pub fn theme_color(&self) -> &str {
        self.theme_color.as_deref().unwrap_or(DEFAULT_THEME_COLOR)
    }

    /// Auto-refresh period, falling back to the default.
    pub fn auto_refresh_interval_ms(&self) -> u64 {
        self.auto_refresh_interval
            .unwrap_or(DEFAULT_AUTO_REFRESH_INTERVAL_MS)
    }
}

fn overwrite<T: Clone>(base: &mut Option<T>, overlay: &Option<T>) {
    if overlay.is_some() {
        *base = overlay.clone();
    }
}

/// Key-by-key merge, one level deep: values at matching keys are replaced
/// whole, base keys absent from the overlay survive.
fn merge_section(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_from_json(value: Value) -> WidgetConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_merge_scalar_last_writer_wins() {
        let base = config_from_json(json!({"botName": "A", "themeColor": "#111"}));
        let overlay = config_from_json(json!({"botName": "B"}));

        let merged = WidgetConfig::merge(&base, &overlay);

        assert_eq!(merged.bot_name.as_deref(), Some("B"));
        // Keys absent from the overlay survive.
        assert_eq!(merged.theme_color.as_deref(), Some("#111"));
    }

    #[test]
    fn test_merge_style_is_deep_one_level() {
        let base = config_from_json(json!({
            "style": {
                "messages": {"bot": {"background": "#eee"}},
                "header": {"background": "#222"}
            }
        }));
        let overlay = config_from_json(json!({
            "style": {"messages": {"bot": {"background": "#fff"}}}
        }));

        let merged = WidgetConfig::merge(&base, &overlay);

        assert_eq!(
            merged.style["messages"]["bot"]["background"],
            json!("#fff")
        );
        // Sibling style key untouched by the overlay survives.
        assert_eq!(merged.style["header"]["background"], json!("#222"));
    }

    #[test]
    fn test_merge_features_deep_one_level() {
        let base = config_from_json(json!({"features": {"a": true, "b": false}}));
        let overlay = config_from_json(json!({"features": {"b": true}}));

        let merged = WidgetConfig::merge(&base, &overlay);

        assert_eq!(merged.features["a"], json!(true));
        assert_eq!(merged.features["b"], json!(true));
    }

    #[test]
    fn test_merge_idempotent() {
        let base = config_from_json(json!({
            "botName": "A",
            "style": {"messages": {"bot": {"color": "#000"}}},
            "features": {"x": 1}
        }));
        let overlay = config_from_json(json!({
            "botName": "B",
            "style": {"messages": {"user": {"color": "#fff"}}},
            "features": {"y": 2}
        }));

        let once = WidgetConfig::merge(&base, &overlay);
        let twice = WidgetConfig::merge(&once, &overlay);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_defaults_only_fill_absent_keys() {
        let config = config_from_json(json!({"botName": "Custom"})).with_defaults();

        assert_eq!(config.bot_name.as_deref(), Some("Custom"));
        assert_eq!(config.theme_color.as_deref(), Some(DEFAULT_THEME_COLOR));
        assert_eq!(config.position, Some(Position::BottomRight));
        assert_eq!(config.bot_url.as_deref(), Some(DEFAULT_BOT_URL));
    }

    #[test]
    fn test_unrecognized_keys_survive_merge() {
        let base = config_from_json(json!({"vendorTag": "abc"}));
        let overlay = config_from_json(json!({"botName": "B"}));

        let merged = WidgetConfig::merge(&base, &overlay);

        assert_eq!(merged.extra["vendorTag"], json!("abc"));
    }

    #[test]
    fn test_from_embed_json_invalid_falls_back() {
        let config = WidgetConfig::from_embed_json("{not json");
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_position_wire_format() {
        let config = config_from_json(json!({"position": "bottom-left"}));
        assert_eq!(config.position, Some(Position::BottomLeft));
    }
}
