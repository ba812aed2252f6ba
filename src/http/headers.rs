// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header filtering
//!
//! Drops the headers a command-line client sets on its own (length,
//! connection, host) and the cookie header, which is captured separately
//! from the cookie store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::names;

/// Filtered header set, keyed by the header name as the host sent it
pub type HeaderSet = HashMap<String, String>;

/// Header names never copied into a capture (compared lower-case)
pub const EXCLUDED_HEADERS: &[&str] = &[
    names::CONTENT_LENGTH,
    names::CONNECTION,
    names::HOST,
    names::COOKIE,
    ":authority",
    ":method",
    ":path",
    ":scheme",
];

/// HTTP/2 pseudo-header prefix
pub const PSEUDO_HEADER_PREFIX: &str = ":";

/// One raw request header as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Check whether a header name is excluded from captures
pub fn is_excluded(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with(PSEUDO_HEADER_PREFIX) || EXCLUDED_HEADERS.contains(&lower.as_str())
}

/// Filter a raw header list into a [`HeaderSet`]
///
/// Names keep their original case. If a name repeats, the last value wins.
pub fn filter_headers(headers: &[HeaderEntry]) -> HeaderSet {
    headers
        .iter()
        .filter(|h| !is_excluded(&h.name))
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_dropped_content_type_kept() {
        let raw = vec![
            HeaderEntry::new("Cookie", "x=1"),
            HeaderEntry::new("Content-Type", "text/plain"),
        ];
        let filtered = filter_headers(&raw);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("Content-Type").map(String::as_str), Some("text/plain"));
    }

    #[test]
    fn test_deny_list_is_case_insensitive() {
        let raw = vec![
            HeaderEntry::new("HOST", "example.com"),
            HeaderEntry::new("Content-Length", "12"),
            HeaderEntry::new("connection", "keep-alive"),
            HeaderEntry::new("cOoKiE", "a=b"),
            HeaderEntry::new(":authority", "example.com"),
            HeaderEntry::new(":Custom-Pseudo", "x"),
            HeaderEntry::new("Referer", "https://example.com/"),
            HeaderEntry::new("X-CSRF-Token", "abc"),
        ];
        let filtered = filter_headers(&raw);

        for name in filtered.keys() {
            assert!(!is_excluded(name), "{} leaked through", name);
        }
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains_key("Referer"));
        assert!(filtered.contains_key("X-CSRF-Token"));
    }

    #[test]
    fn test_every_mixed_case_variant_is_dropped() {
        let raw: Vec<HeaderEntry> = EXCLUDED_HEADERS
            .iter()
            .flat_map(|name| {
                vec![
                    HeaderEntry::new(*name, "v"),
                    HeaderEntry::new(name.to_ascii_uppercase(), "v"),
                ]
            })
            .collect();

        assert!(filter_headers(&raw).is_empty());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let raw = vec![
            HeaderEntry::new("Accept", "text/html"),
            HeaderEntry::new("Accept", "*/*"),
        ];
        assert_eq!(filter_headers(&raw)["Accept"], "*/*");
    }

    #[test]
    fn test_empty_list() {
        assert!(filter_headers(&[]).is_empty());
    }
}
