// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Observed request details

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::Result;
use crate::http::{HeaderEntry, RequestBody};

/// Details of one in-flight request, as the host reports them
///
/// The same `request_id` is delivered to both observation phases of a
/// request. Header-phase events carry `request_headers`, body-phase events
/// carry `request_body`.
#[derive(Debug, Clone)]
pub struct RequestDetails {
    /// Host-assigned correlation token
    pub request_id: String,
    /// Request URL
    pub url: Url,
    /// HTTP method (upper case)
    pub method: String,
    /// Raw header list (header phase)
    pub request_headers: Option<Vec<HeaderEntry>>,
    /// Body in whichever shape the host parsed it (body phase)
    pub request_body: Option<RequestBody>,
    /// When the host observed the request
    pub timestamp: DateTime<Utc>,
}

impl RequestDetails {
    /// Create details for a request
    pub fn new(request_id: impl Into<String>, method: &str, url: &str) -> Result<Self> {
        Ok(Self {
            request_id: request_id.into(),
            url: Url::parse(url)?,
            method: method.to_ascii_uppercase(),
            request_headers: None,
            request_body: None,
            timestamp: Utc::now(),
        })
    }

    /// Create details for a POST request
    pub fn post(request_id: impl Into<String>, url: &str) -> Result<Self> {
        Self::new(request_id, "POST", url)
    }

    /// Attach the raw header list
    pub fn headers(mut self, headers: Vec<HeaderEntry>) -> Self {
        self.request_headers = Some(headers);
        self
    }

    /// Add one raw header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers
            .get_or_insert_with(Vec::new)
            .push(HeaderEntry::new(name, value));
        self
    }

    /// Attach the request body
    pub fn body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let details = RequestDetails::new("42", "post", "https://example.com/dl")
            .unwrap()
            .header("Accept", "*/*")
            .header("Referer", "https://example.com/")
            .body(RequestBody::raw("x=1"));

        assert_eq!(details.method, "POST");
        assert_eq!(details.request_headers.as_ref().map(Vec::len), Some(2));
        assert!(details.request_body.is_some());
    }

    #[test]
    fn test_bad_url() {
        assert!(RequestDetails::post("1", "not a url").is_err());
    }
}
