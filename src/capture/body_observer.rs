// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Body phase: build the consolidated record
//!
//! Extracts the payload, claims the headers parked by the header phase,
//! adds the target domain's cookies and replaces `lastRequest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::latest::LatestCapture;
use super::record::{now_millis, pending_key, CaptureRecord, StoredHeaders, PENDING_KEY_PREFIX};
use super::stats::CaptureStats;
use crate::error::Result;
use crate::http::{cookie_string, CookieSource, HeaderSet};
use crate::network::{NetworkObserver, RequestDetails, RequestFilter};
use crate::store::KeyValueStore;

/// Settings the body observer needs from the capture config
#[derive(Debug, Clone)]
pub struct BodyCaptureSettings {
    /// Domain queried for cookies
    pub cookie_domain: String,
    /// Wait before the single correlation retry
    pub retry_delay: Duration,
    /// Pending entries at least this old count as missing
    pub header_retention: Duration,
}

/// Turns a matching request's body into the consolidated capture record
pub struct BodyCaptureObserver {
    filter: RequestFilter,
    settings: BodyCaptureSettings,
    store: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieSource>,
    latest: Arc<LatestCapture>,
    stats: Arc<CaptureStats>,
}

impl BodyCaptureObserver {
    pub fn new(
        filter: RequestFilter,
        settings: BodyCaptureSettings,
        store: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieSource>,
        latest: Arc<LatestCapture>,
        stats: Arc<CaptureStats>,
    ) -> Self {
        Self {
            filter,
            settings,
            store,
            cookies,
            latest,
            stats,
        }
    }

    /// Run one capture attempt
    ///
    /// Store and cookie failures abort the attempt before `lastRequest` is
    /// touched.
    pub async fn capture(&self, details: &RequestDetails) -> Result<CaptureRecord> {
        tracing::info!(
            request_id = %details.request_id,
            url = %details.url,
            "Capturing download request"
        );

        let payload = extract_payload(details);
        let headers = self.claim_headers(&details.request_id).await?;

        let cookies = self
            .cookies
            .cookies_for_domain(&self.settings.cookie_domain)
            .await?;
        let cookie = cookie_string(&cookies);
        tracing::debug!(
            count = cookies.len(),
            domain = %self.settings.cookie_domain,
            "Captured cookies"
        );

        let record = CaptureRecord {
            cookie,
            payload,
            headers,
            timestamp: now_millis(),
            url: details.url.to_string(),
        };
        self.latest.publish(&record).await?;

        tracing::info!(
            request_id = %details.request_id,
            payload_len = record.payload.len(),
            headers = record.headers.len(),
            "Request captured"
        );
        Ok(record)
    }

    /// Take the pending headers for a request, retrying once after the delay
    ///
    /// A miss after the retry yields an empty header set.
    async fn claim_headers(&self, request_id: &str) -> Result<HeaderSet> {
        let key = pending_key(request_id);

        let mut headers = self.take_live(&key).await?;
        if headers.is_none() {
            tracing::debug!(
                key = %key,
                delay_ms = self.settings.retry_delay.as_millis() as u64,
                "Headers not stored yet, retrying"
            );
            tokio::time::sleep(self.settings.retry_delay).await;
            headers = self.take_live(&key).await?;
        }

        match headers {
            Some(headers) => {
                tracing::debug!(key = %key, count = headers.len(), "Using stored headers");
                Ok(headers)
            }
            None => {
                self.stats.record_header_miss();
                let waiting = self.pending_ids().await;
                tracing::warn!(key = %key, pending = ?waiting, "No stored headers for request");
                Ok(HeaderSet::new())
            }
        }
    }

    /// Claim an entry's headers, treating stale or unreadable entries as absent
    async fn take_live(&self, key: &str) -> Result<Option<HeaderSet>> {
        let Some(entry) = self.store.take(key).await? else {
            return Ok(None);
        };

        let Some(stored) = StoredHeaders::from_value(&entry) else {
            tracing::warn!(key = %key, "Discarding pending entry without a headers map");
            return Ok(None);
        };
        if stored.is_expired(now_millis(), self.settings.header_retention) {
            tracing::debug!(key = %key, "Discarding expired pending headers");
            return Ok(None);
        }

        Ok(Some(stored.headers))
    }

    /// Request ids with headers still waiting, for diagnostics
    async fn pending_ids(&self) -> Vec<String> {
        match self.store.keys().await {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|k| k.strip_prefix(PENDING_KEY_PREFIX).map(String::from))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Payload string of a request body; decode problems give an empty payload
pub fn extract_payload(details: &RequestDetails) -> String {
    let Some(body) = details.request_body.as_ref() else {
        tracing::warn!(request_id = %details.request_id, "No request body captured");
        return String::new();
    };

    match body.to_payload() {
        Ok(payload) => {
            if payload.is_empty() {
                tracing::warn!(request_id = %details.request_id, "Request body is empty");
            }
            payload
        }
        Err(e) => {
            tracing::error!(
                request_id = %details.request_id,
                error = %e,
                "Failed to decode request body"
            );
            String::new()
        }
    }
}

#[async_trait]
impl NetworkObserver for BodyCaptureObserver {
    fn should_observe(&self, details: &RequestDetails) -> bool {
        self.filter.matches(details)
    }

    async fn on_before_body_sent(&self, details: &RequestDetails) {
        match self.capture(details).await {
            Ok(_) => self.stats.record_capture(),
            Err(e) => {
                self.stats.record_failure();
                tracing::error!(
                    request_id = %details.request_id,
                    error = %e,
                    "Capture attempt failed"
                );
            }
        }
    }
}
