// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Single-slot register holding the most recent capture

use std::sync::Arc;

use tokio::sync::Mutex;

use super::notify::CaptureNotifier;
use super::record::{CaptureMessage, CaptureRecord, LAST_REQUEST_KEY};
use crate::error::Result;
use crate::store::{get_json, set_json, KeyValueStore};

/// Overwrite-only register over the `lastRequest` store key
///
/// A write and its notification happen under one lock, so the record
/// listeners hear about is the record left in the store.
pub struct LatestCapture {
    store: Arc<dyn KeyValueStore>,
    notifier: CaptureNotifier,
    write_lock: Mutex<()>,
}

impl LatestCapture {
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: CaptureNotifier) -> Self {
        Self {
            store,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the stored record and notify listeners
    ///
    /// If the store write fails nothing is published and the previous
    /// record stays in place.
    pub async fn publish(&self, record: &CaptureRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        set_json(self.store.as_ref(), LAST_REQUEST_KEY, record).await?;
        let listeners = self.notifier.publish(CaptureMessage::from(record));
        tracing::debug!(listeners, url = %record.url, "Capture record stored");
        Ok(())
    }

    /// Read the current record
    pub async fn read(&self) -> Result<Option<CaptureRecord>> {
        get_json(self.store.as_ref(), LAST_REQUEST_KEY).await
    }

    /// Remove the current record
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(LAST_REQUEST_KEY).await
    }

    /// Notifier used for capture messages
    pub fn notifier(&self) -> &CaptureNotifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HeaderSet;
    use crate::store::MemoryStore;

    fn record(payload: &str) -> CaptureRecord {
        CaptureRecord {
            cookie: "sid=1".into(),
            payload: payload.into(),
            headers: HeaderSet::new(),
            timestamp: 1,
            url: "https://example.com/dl".into(),
        }
    }

    #[tokio::test]
    async fn test_overwrite_semantics() {
        let store = Arc::new(MemoryStore::new());
        let latest = LatestCapture::new(store.clone(), CaptureNotifier::default());
        assert!(latest.read().await.unwrap().is_none());

        latest.publish(&record("first")).await.unwrap();
        latest.publish(&record("second")).await.unwrap();

        assert_eq!(latest.read().await.unwrap().unwrap().payload, "second");
        assert_eq!(store.len(), 1);

        latest.clear().await.unwrap();
        assert!(latest.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_notifies_with_stored_record() {
        let latest = LatestCapture::new(Arc::new(MemoryStore::new()), CaptureNotifier::default());
        let mut rx = latest.notifier().subscribe();

        latest.publish(&record("body")).await.unwrap();

        let CaptureMessage::RequestCaptured(data) = rx.recv().await.unwrap();
        assert_eq!(data.payload, "body");
        assert_eq!(data.cookie, "sid=1");
    }
}
