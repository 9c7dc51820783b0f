//! The shared effective configuration and the remote refresh path.

use hearth_core::config::WidgetConfig;
use hearth_core::{HearthError, Result};
use reqwest::Client;
use std::sync::{Arc, RwLock};

/// Shared handle to the effective config.
///
/// Reads take a full snapshot; writes replace the whole value. A concurrent
/// reader therefore always sees either the fully-old or fully-new config,
/// never a partially merged one.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<WidgetConfig>>,
}

impl ConfigHandle {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Snapshot of the current effective config.
    pub fn current(&self) -> WidgetConfig {
        self.inner.read().unwrap().clone()
    }

    /// Atomically replaces the effective config.
    pub fn replace(&self, config: WidgetConfig) {
        *self.inner.write().unwrap() = config;
    }
}

/// Fetches remote configuration and folds it into the effective config.
#[derive(Clone)]
pub struct ConfigResolver {
    handle: ConfigHandle,
    client: Client,
}

impl ConfigResolver {
    pub fn new(handle: ConfigHandle) -> Self {
        Self {
            handle,
            client: Client::new(),
        }
    }

    pub fn handle(&self) -> &ConfigHandle {
        &self.handle
    }

    /// Fetches `{configApiUrl}?t={millis}` (cache-busted), merges the
    /// result into the current effective config and replaces the handle.
    ///
    /// On any failure the existing config is left untouched and the error
    /// is returned; the caller logs it and moves on. Never retried here.
    pub async fn refresh(&self) -> Result<WidgetConfig> {
        let current = self.handle.current();
        let url = current.config_api_url.clone().ok_or_else(|| {
            HearthError::config_fetch(None, "No configApiUrl configured")
        })?;

        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("t", timestamp.as_str())])
            .send()
            .await
            .map_err(|err| {
                HearthError::config_fetch(None, format!("Config fetch failed: {}", err))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HearthError::config_fetch(
                Some(status.as_u16()),
                format!("Config endpoint returned {}", status),
            ));
        }

        let overlay: WidgetConfig = response.json().await.map_err(|err| {
            HearthError::config_fetch(
                Some(status.as_u16()),
                format!("Malformed config JSON: {}", err),
            )
        })?;

        let merged = WidgetConfig::merge(&current, &overlay).with_defaults();
        self.handle.replace(merged.clone());
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_without_url_errors_and_preserves_config() {
        let handle = ConfigHandle::new(WidgetConfig::default().with_defaults());
        let before = handle.current();
        let resolver = ConfigResolver::new(handle.clone());

        let result = resolver.refresh().await;

        assert!(result.is_err());
        assert_eq!(handle.current(), before);
    }

    #[test]
    fn test_replace_is_whole_value() {
        let handle = ConfigHandle::new(WidgetConfig::default());

        let mut next = WidgetConfig::default();
        next.bot_name = Some("Next".to_string());
        handle.replace(next.clone());

        assert_eq!(handle.current(), next);
    }
}
