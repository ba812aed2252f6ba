// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Stored capture shapes and their store keys

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HeaderSet;

/// Prefix of pending header entries
pub const PENDING_KEY_PREFIX: &str = "req_headers_";

/// Key of the consolidated capture record
pub const LAST_REQUEST_KEY: &str = "lastRequest";

/// Store key of the pending header entry for a request
pub fn pending_key(request_id: &str) -> String {
    format!("{}{}", PENDING_KEY_PREFIX, request_id)
}

/// Current time in Unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Headers captured for a request, waiting for its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCapture {
    /// Filtered header set
    pub headers: HeaderSet,
    /// Creation time (Unix ms)
    pub timestamp: i64,
    /// Request the headers belong to
    pub request_id: String,
}

impl PendingCapture {
    pub fn new(request_id: impl Into<String>, headers: HeaderSet) -> Self {
        Self {
            headers,
            timestamp: now_millis(),
            request_id: request_id.into(),
        }
    }
}

/// What the body phase can salvage from a stored pending entry
///
/// Only `headers` is required. Entries written without a timestamp never
/// expire passively, and non-string header values are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredHeaders {
    pub headers: HeaderSet,
    pub timestamp: Option<i64>,
}

impl StoredHeaders {
    /// Read an entry leniently; `None` when it has no `headers` object
    pub fn from_value(value: &Value) -> Option<Self> {
        let headers = value
            .get("headers")?
            .as_object()?
            .iter()
            .filter_map(|(name, v)| v.as_str().map(|v| (name.clone(), v.to_string())))
            .collect();

        Some(Self {
            headers,
            timestamp: value.get("timestamp").and_then(Value::as_i64),
        })
    }

    /// True once the entry is at least `retention` old
    pub fn is_expired(&self, now_ms: i64, retention: Duration) -> bool {
        self.timestamp
            .map_or(false, |ts| now_ms.saturating_sub(ts) >= retention.as_millis() as i64)
    }
}

/// The single most recent capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// `name=value; ...` for the target domain
    pub cookie: String,
    /// Serialized request body
    pub payload: String,
    /// Filtered request headers; empty when correlation missed
    #[serde(default)]
    pub headers: HeaderSet,
    /// Capture time (Unix ms)
    pub timestamp: i64,
    /// Request URL
    pub url: String,
}

impl CaptureRecord {
    /// A record is usable by the downloader once cookie and payload are set
    pub fn is_ready(&self) -> bool {
        !self.cookie.is_empty() && !self.payload.is_empty()
    }

    /// Seconds since capture, relative to `now_ms`
    pub fn age_secs(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp).max(0) / 1000
    }
}

/// Payload of a capture notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedData {
    pub cookie: String,
    pub payload: String,
    pub headers: HeaderSet,
}

/// Message broadcast to capture listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CaptureMessage {
    /// A new consolidated record was stored
    RequestCaptured(CapturedData),
}

impl From<&CaptureRecord> for CaptureMessage {
    fn from(record: &CaptureRecord) -> Self {
        CaptureMessage::RequestCaptured(CapturedData {
            cookie: record.cookie.clone(),
            payload: record.payload.clone(),
            headers: record.headers.clone(),
        })
    }
}
