// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header phase: filter and park the request headers until the body arrives

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::record::{pending_key, PendingCapture};
use crate::error::Result;
use crate::http::{filter_headers, HeaderSet};
use crate::network::{NetworkObserver, RequestDetails, RequestFilter};
use crate::store::{set_json, KeyValueStore};

/// Stores the filtered headers of matching requests under `req_headers_<id>`
pub struct HeaderCaptureObserver {
    filter: RequestFilter,
    store: Arc<dyn KeyValueStore>,
    retention: Duration,
}

impl HeaderCaptureObserver {
    pub fn new(filter: RequestFilter, store: Arc<dyn KeyValueStore>, retention: Duration) -> Self {
        Self {
            filter,
            store,
            retention,
        }
    }

    /// Capture the headers of one request
    ///
    /// Returns `Ok(None)` without writing anything when the host delivered
    /// no headers.
    pub async fn capture(&self, details: &RequestDetails) -> Result<Option<HeaderSet>> {
        let raw = match details.request_headers.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                tracing::warn!(
                    request_id = %details.request_id,
                    url = %details.url,
                    "Request headers empty or missing, nothing stored"
                );
                return Ok(None);
            }
        };

        let headers = filter_headers(raw);
        if headers.is_empty() {
            tracing::warn!(
                request_id = %details.request_id,
                raw = ?raw.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(),
                "No headers left after filtering"
            );
        }

        let key = pending_key(&details.request_id);
        let pending = PendingCapture::new(details.request_id.clone(), headers.clone());
        set_json(self.store.as_ref(), &key, &pending).await?;
        tracing::debug!(
            key = %key,
            raw = raw.len(),
            kept = headers.len(),
            "Stored pending headers"
        );

        self.schedule_expiry(key);
        Ok(Some(headers))
    }

    /// Drop the entry after the retention window if nobody consumed it
    fn schedule_expiry(&self, key: String) {
        let store = self.store.clone();
        let retention = self.retention;
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            if let Err(e) = store.remove(&key).await {
                tracing::warn!(key = %key, error = %e, "Failed to expire pending headers");
            }
        });
    }
}

#[async_trait]
impl NetworkObserver for HeaderCaptureObserver {
    fn should_observe(&self, details: &RequestDetails) -> bool {
        self.filter.matches(details)
    }

    async fn on_before_headers_sent(&self, details: &RequestDetails) {
        if let Err(e) = self.capture(details).await {
            tracing::error!(
                request_id = %details.request_id,
                error = %e,
                "Failed to store request headers"
            );
        }
    }

    fn priority(&self) -> i32 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MatchPattern;
    use crate::store::{get_json, MemoryStore};

    const URL: &str = "https://opensource.samsung.com/downSrcCode";

    fn observer(store: Arc<MemoryStore>, retention: Duration) -> HeaderCaptureObserver {
        let filter = RequestFilter::new(
            MatchPattern::parse("*://opensource.samsung.com/downSrcCode").unwrap(),
            "POST",
        );
        HeaderCaptureObserver::new(filter, store, retention)
    }

    #[tokio::test]
    async fn test_stores_filtered_headers() {
        let store = Arc::new(MemoryStore::new());
        let obs = observer(store.clone(), Duration::from_secs(30));
        let details = RequestDetails::post("77", URL)
            .unwrap()
            .header("Cookie", "x=1")
            .header("Content-Type", "text/plain");

        obs.on_before_headers_sent(&details).await;

        let pending: PendingCapture = get_json(store.as_ref(), "req_headers_77")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pending.request_id, "77");
        assert_eq!(pending.headers.len(), 1);
        assert_eq!(pending.headers["Content-Type"], "text/plain");
    }

    #[tokio::test]
    async fn test_missing_headers_write_nothing() {
        let store = Arc::new(MemoryStore::new());
        let obs = observer(store.clone(), Duration::from_secs(30));

        let none = RequestDetails::post("1", URL).unwrap();
        let empty = RequestDetails::post("2", URL).unwrap().headers(Vec::new());

        assert!(obs.capture(&none).await.unwrap().is_none());
        assert!(obs.capture(&empty).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_all_filtered_still_stored() {
        let store = Arc::new(MemoryStore::new());
        let obs = observer(store.clone(), Duration::from_secs(30));
        let details = RequestDetails::post("3", URL).unwrap().header("Host", "x");

        let headers = obs.capture(&details).await.unwrap().unwrap();
        assert!(headers.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_retention() {
        let store = Arc::new(MemoryStore::new());
        let obs = observer(store.clone(), Duration::from_secs(30));
        let details = RequestDetails::post("9", URL).unwrap().header("Accept", "*/*");

        obs.capture(&details).await.unwrap();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(store.get("req_headers_9").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.get("req_headers_9").await.unwrap().is_none());
    }

    #[test]
    fn test_scope() {
        let obs = observer(Arc::new(MemoryStore::new()), Duration::from_secs(30));

        assert!(obs.should_observe(&RequestDetails::post("1", URL).unwrap()));
        assert!(!obs.should_observe(&RequestDetails::new("1", "GET", URL).unwrap()));
        assert!(!obs.should_observe(
            &RequestDetails::post("1", "https://opensource.samsung.com/other").unwrap()
        ));
    }
}
