// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Wires the two capture observers to shared state

use std::sync::Arc;

use tokio::sync::broadcast;

use super::body_observer::{BodyCaptureObserver, BodyCaptureSettings};
use super::header_observer::HeaderCaptureObserver;
use super::latest::LatestCapture;
use super::notify::CaptureNotifier;
use super::record::{CaptureMessage, CaptureRecord};
use super::stats::{CaptureStats, StatsSnapshot};
use crate::config::CaptureConfig;
use crate::error::Result;
use crate::http::CookieSource;
use crate::network::{ObserverRegistry, RequestFilter};
use crate::store::KeyValueStore;

/// Header and body capture observers sharing one store, cookie source and
/// notification channel
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dlcapture::{CaptureConfig, Capturer, CookieJar, MemoryStore, RequestDetails};
///
/// # async fn run() -> dlcapture::Result<()> {
/// let capturer = Capturer::new(
///     CaptureConfig::default(),
///     Arc::new(MemoryStore::new()),
///     Arc::new(CookieJar::new()),
/// );
/// let registry = capturer.registry();
///
/// let details = RequestDetails::post("1", "https://opensource.samsung.com/downSrcCode")?
///     .header("Referer", "https://opensource.samsung.com/");
/// registry.dispatch_headers(&details).await;
/// registry.dispatch_body(&details).await;
///
/// println!("{:?}", capturer.last_capture().await?);
/// # Ok(())
/// # }
/// ```
pub struct Capturer {
    config: CaptureConfig,
    latest: Arc<LatestCapture>,
    stats: Arc<CaptureStats>,
    header_observer: Arc<HeaderCaptureObserver>,
    body_observer: Arc<BodyCaptureObserver>,
}

impl Capturer {
    pub fn new(
        config: CaptureConfig,
        store: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieSource>,
    ) -> Self {
        let filter = RequestFilter::new(config.url_pattern.clone(), config.method.clone());
        let notifier = CaptureNotifier::new(config.notify_capacity);
        let latest = Arc::new(LatestCapture::new(store.clone(), notifier));
        let stats = Arc::new(CaptureStats::default());

        let header_observer = Arc::new(HeaderCaptureObserver::new(
            filter.clone(),
            store.clone(),
            config.header_retention,
        ));
        let body_observer = Arc::new(BodyCaptureObserver::new(
            filter,
            BodyCaptureSettings {
                cookie_domain: config.cookie_domain.clone(),
                retry_delay: config.retry_delay,
                header_retention: config.header_retention,
            },
            store,
            cookies,
            latest.clone(),
            stats.clone(),
        ));

        tracing::debug!(pattern = %config.url_pattern, method = %config.method, "Capturer ready");

        Self {
            config,
            latest,
            stats,
            header_observer,
            body_observer,
        }
    }

    /// Register both observers with a host's registry
    pub fn register(&self, registry: &mut ObserverRegistry) {
        registry.add_shared(self.header_observer.clone());
        registry.add_shared(self.body_observer.clone());
    }

    /// A registry containing just this capturer's observers
    pub fn registry(&self) -> ObserverRegistry {
        let mut registry = ObserverRegistry::new();
        self.register(&mut registry);
        registry
    }

    /// Listen for capture notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureMessage> {
        self.latest.notifier().subscribe()
    }

    /// The most recent capture, if any
    pub async fn last_capture(&self) -> Result<Option<CaptureRecord>> {
        self.latest.read().await
    }

    /// Counter snapshot
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn header_observer(&self) -> &HeaderCaptureObserver {
        &self.header_observer
    }

    pub fn body_observer(&self) -> &BodyCaptureObserver {
        &self.body_observer
    }
}
