//! Three-tier style resolution.
//!
//! A resolved style map is computed from, in increasing precedence:
//! (a) defaults derived from the global `style.messages` section through a
//! fixed lookup table, (b) `style.components[component][element]` in the
//! effective config, (c) the per-message override tree. Resolution is a
//! pure function of its inputs so a re-render is deterministic.

use crate::config::WidgetConfig;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Resolved style properties for one rendered element, ordered for
/// deterministic iteration.
pub type StyleMap = BTreeMap<String, Value>;

/// A per-message (or per-custom-payload) override tree:
/// `overrides[component][element] -> { property: value }`.
pub type StyleOverrides = Map<String, Value>;

/// Tier (a): which `style.messages` subsection seeds the defaults for a
/// given (component, element) pair. Pairs not listed start empty.
const DEFAULT_SOURCES: &[((&str, &str), &str)] = &[
    (("user_text", "container"), "user"),
    (("bot_text", "container"), "bot"),
    (("buttons", "container"), "bot"),
    (("buttons", "button"), "button"),
    (("carousel", "container"), "bot"),
    (("carousel", "button"), "button"),
    (("locations", "container"), "bot"),
    (("faq", "container"), "bot"),
    (("table", "container"), "bot"),
    (("rating", "container"), "bot"),
    (("rating", "star"), "button"),
    (("form", "container"), "bot"),
    (("form", "submit"), "button"),
];

/// Resolves the style for one element of one component.
///
/// Later tiers overwrite identically-named properties of earlier tiers;
/// properties unset in every tier are absent from the result.
pub fn resolve(
    config: &WidgetConfig,
    component: &str,
    element: &str,
    message_override: Option<&StyleOverrides>,
) -> StyleMap {
    let mut resolved = StyleMap::new();

    // Tier (a): defaults derived from style.messages.
    if let Some(section) = default_source(component, element) {
        if let Some(defaults) = object_at(&config.style, &["messages", section]) {
            apply(&mut resolved, defaults);
        }
    }

    // Tier (b): per-component/per-element config style.
    if let Some(configured) = object_at(&config.style, &["components", component, element]) {
        apply(&mut resolved, configured);
    }

    // Tier (c): per-message inline override.
    if let Some(overrides) = message_override {
        if let Some(inline) = object_at(overrides, &[component, element]) {
            apply(&mut resolved, inline);
        }
    }

    resolved
}

fn default_source(component: &str, element: &str) -> Option<&'static str> {
    DEFAULT_SOURCES
        .iter()
        .find(|((c, e), _)| *c == component && *e == element)
        .map(|(_, section)| *section)
}

/// Walks nested JSON objects along `path`, returning the object at the end
/// of the path if every step is an object.
fn object_at<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Map<String, Value>> {
    let mut current = root;
    for key in path {
        current = current.get(*key)?.as_object()?;
    }
    Some(current)
}

fn apply(target: &mut StyleMap, source: &Map<String, Value>) {
    for (property, value) in source {
        target.insert(property.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_style(style: Value) -> WidgetConfig {
        serde_json::from_value(json!({ "style": style })).unwrap()
    }

    #[test]
    fn test_default_tier_from_messages_section() {
        let config = config_with_style(json!({
            "messages": {"bot": {"background": "#f1f0f0", "color": "#000"}}
        }));

        let resolved = resolve(&config, "bot_text", "container", None);

        assert_eq!(resolved["background"], json!("#f1f0f0"));
        assert_eq!(resolved["color"], json!("#000"));
    }

    #[test]
    fn test_config_tier_overrides_defaults() {
        let config = config_with_style(json!({
            "messages": {"bot": {"background": "#f1f0f0", "color": "#000"}},
            "components": {"bot_text": {"container": {"background": "#222"}}}
        }));

        let resolved = resolve(&config, "bot_text", "container", None);

        assert_eq!(resolved["background"], json!("#222"));
        // Property unset at the config tier survives from the default tier.
        assert_eq!(resolved["color"], json!("#000"));
    }

    #[test]
    fn test_message_override_tier_wins() {
        let config = config_with_style(json!({
            "messages": {"button": {"color": "#00f"}},
            "components": {"buttons": {"button": {"color": "#0f0"}}}
        }));
        let overrides: StyleOverrides =
            serde_json::from_value(json!({"buttons": {"button": {"color": "#f00"}}})).unwrap();

        let resolved = resolve(&config, "buttons", "button", Some(&overrides));

        assert_eq!(resolved["color"], json!("#f00"));
    }

    #[test]
    fn test_unset_properties_are_absent() {
        let config = WidgetConfig::default();
        let resolved = resolve(&config, "table", "container", None);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_unknown_pair_has_no_default_tier() {
        let config = config_with_style(json!({
            "messages": {"bot": {"background": "#eee"}}
        }));
        // (image, container) is not in the default lookup table.
        let resolved = resolve(&config, "image", "container", None);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolution_is_pure() {
        let config = config_with_style(json!({
            "messages": {"user": {"background": "#4a90e2"}}
        }));

        let first = resolve(&config, "user_text", "container", None);
        let second = resolve(&config, "user_text", "container", None);

        assert_eq!(first, second);
    }
}
