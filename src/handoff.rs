// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Operator hand-off formats
//!
//! The downloader takes one pasted argument: base64 of
//!
//! ```text
//! COOKIE: <cookie>
//! PAYLOAD: <payload>
//! HEADERS: <compact json object>
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureRecord;
use crate::error::{Error, Result};
use crate::http::HeaderSet;

const COOKIE_PREFIX: &str = "COOKIE: ";
const PAYLOAD_PREFIX: &str = "PAYLOAD: ";
const HEADERS_PREFIX: &str = "HEADERS: ";

/// What the downloader needs from a capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffBundle {
    pub cookie: String,
    pub payload: String,
    pub headers: HeaderSet,
}

impl From<&CaptureRecord> for HandoffBundle {
    fn from(record: &CaptureRecord) -> Self {
        Self {
            cookie: record.cookie.clone(),
            payload: record.payload.clone(),
            headers: record.headers.clone(),
        }
    }
}

impl HandoffBundle {
    /// Newline-separated text block
    pub fn to_text(&self) -> Result<String> {
        let headers = serde_json::to_string(&self.headers)?;
        Ok(format!(
            "{}{}\n{}{}\n{}{}",
            COOKIE_PREFIX, self.cookie, PAYLOAD_PREFIX, self.payload, HEADERS_PREFIX, headers
        ))
    }

    /// Base64 blob of the text block
    pub fn encode(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_text()?.as_bytes()))
    }

    /// Parse a text block
    ///
    /// The payload may itself contain newlines; the cookie line and the
    /// single-line headers JSON bound it.
    pub fn from_text(text: &str) -> Result<Self> {
        let rest = text
            .strip_prefix(COOKIE_PREFIX)
            .ok_or_else(|| Error::handoff("missing COOKIE line"))?;
        let (cookie, rest) = rest
            .split_once(&format!("\n{}", PAYLOAD_PREFIX))
            .ok_or_else(|| Error::handoff("missing PAYLOAD line"))?;
        let (payload, headers) = match rest.rfind(&format!("\n{}", HEADERS_PREFIX)) {
            Some(idx) => (&rest[..idx], &rest[idx + 1 + HEADERS_PREFIX.len()..]),
            None => (rest, "{}"),
        };

        let headers: HeaderSet = serde_json::from_str(headers.trim_end())
            .map_err(|e| Error::handoff(format!("HEADERS is not a JSON object: {}", e)))?;

        Ok(Self {
            cookie: cookie.to_string(),
            payload: payload.to_string(),
            headers,
        })
    }

    /// Decode a base64 blob
    pub fn decode(blob: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(blob.trim())
            .map_err(|e| Error::handoff(format!("not base64: {}", e)))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::handoff(format!("not UTF-8: {}", e)))?;
        Self::from_text(&text)
    }
}

/// Cookie and payload as a two-part note
pub fn both_text(record: &CaptureRecord) -> String {
    format!("Cookie: {}\n\nPOST Data: {}", record.cookie, record.payload)
}

/// Pretty-printed headers JSON
pub fn headers_json(record: &CaptureRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(&record.headers)?)
}

/// Size and age figures shown next to a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Payload length in characters
    pub payload_len: usize,
    /// Number of `;`-separated cookies
    pub cookie_count: usize,
    /// Number of captured headers
    pub header_count: usize,
    /// Seconds since capture
    pub age_secs: i64,
}

impl CaptureSummary {
    pub fn new(record: &CaptureRecord, now_ms: i64) -> Self {
        let cookie_count = if record.cookie.trim().is_empty() {
            0
        } else {
            record.cookie.split(';').count()
        };

        Self {
            payload_len: record.payload.chars().count(),
            cookie_count,
            header_count: record.headers.len(),
            age_secs: record.age_secs(now_ms),
        }
    }
}
