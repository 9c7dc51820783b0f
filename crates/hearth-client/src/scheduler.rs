//! Periodic configuration refresh.
//!
//! One cancellation handle, at most one live timer per widget instance.
//! A failed tick logs and waits for the next interval; `stop` guarantees no
//! further ticks fire (an in-flight fetch finishes but never reschedules).

use crate::config_resolver::ConfigResolver;
use crate::SharedSurface;
use async_trait::async_trait;
use hearth_core::config::WidgetConfig;
use hearth_core::{ChromeText, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// The refresh step behind the timer. [`ConfigResolver`] is the production
/// source; tests script their own.
#[async_trait]
trait RefreshSource: Send + Sync {
    async fn refresh(&self) -> Result<WidgetConfig>;
}

#[async_trait]
impl RefreshSource for ConfigResolver {
    async fn refresh(&self) -> Result<WidgetConfig> {
        ConfigResolver::refresh(self).await
    }
}

/// Re-pulls remote configuration on a fixed interval and reapplies the
/// chrome text on each successful refresh.
pub struct AutoRefreshScheduler {
    source: Arc<dyn RefreshSource>,
    surface: SharedSurface,
    cancel: Option<CancellationToken>,
}

impl AutoRefreshScheduler {
    pub fn new(resolver: ConfigResolver, surface: SharedSurface) -> Self {
        Self {
            source: Arc::new(resolver),
            surface,
            cancel: None,
        }
    }

    #[cfg(test)]
    fn with_source(source: Arc<dyn RefreshSource>, surface: SharedSurface) -> Self {
        Self {
            source,
            surface,
            cancel: None,
        }
    }

    /// Starts the periodic refresh. A prior timer, if any, is stopped
    /// first, so two starts in a row still leave exactly one live timer.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let source = self.source.clone();
        let surface = self.surface.clone();

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval fires immediately; swallow that first tick so the
            // initial refresh stays where init put it.
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = timer.tick() => {
                        match source.refresh().await {
                            Ok(config) => {
                                let chrome = ChromeText::from_config(&config);
                                surface.lock().unwrap().apply_chrome(chrome);
                            }
                            Err(err) => {
                                // Not fatal: retry on the next interval.
                                log::warn!("Config refresh tick failed: {}", err);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Cancels rescheduling. Idempotent.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }

    /// True while a timer is live.
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for AutoRefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
