// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::network::MatchPattern;

/// Endpoint whose POSTs are captured by default
pub const DEFAULT_URL_PATTERN: &str = "*://opensource.samsung.com/downSrcCode";

/// Domain whose cookies are attached to a capture by default
pub const DEFAULT_COOKIE_DOMAIN: &str = "opensource.samsung.com";

/// How long a pending header entry survives unconsumed
pub const DEFAULT_HEADER_RETENTION: Duration = Duration::from_secs(30);

/// Delay before the single correlation retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Default path of the JSON-file store used by the CLI
pub const DEFAULT_STORE_PATH: &str = "dlcapture-store.json";

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Requests whose URL matches this pattern are captured
    pub url_pattern: MatchPattern,
    /// HTTP method to capture (upper case)
    pub method: String,
    /// Domain queried for the cookie string
    pub cookie_domain: String,
    /// Lifetime of an unconsumed pending header entry
    pub header_retention: Duration,
    /// Wait before re-checking for headers that have not arrived yet
    pub retry_delay: Duration,
    /// Buffer size of the capture notification channel
    pub notify_capacity: usize,
    /// Store file for the CLI
    pub store_path: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            // The built-in pattern is a valid literal
            url_pattern: MatchPattern::parse(DEFAULT_URL_PATTERN)
                .unwrap_or_else(|e| panic!("default url pattern: {}", e)),
            method: "POST".to_string(),
            cookie_domain: DEFAULT_COOKIE_DOMAIN.to_string(),
            header_retention: DEFAULT_HEADER_RETENTION,
            retry_delay: DEFAULT_RETRY_DELAY,
            notify_capacity: 16,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl CaptureConfig {
    /// Create a new capture config
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from defaults overridden by `DLCAPTURE_*` variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(pattern) = std::env::var("DLCAPTURE_URL_PATTERN") {
            config = config.url_pattern(&pattern)?;
        }
        if let Ok(domain) = std::env::var("DLCAPTURE_COOKIE_DOMAIN") {
            config = config.cookie_domain(domain);
        }
        if let Ok(secs) = std::env::var("DLCAPTURE_RETENTION_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|e| Error::config(format!("DLCAPTURE_RETENTION_SECS: {}", e)))?;
            config = config.header_retention(Duration::from_secs(secs));
        }
        if let Ok(ms) = std::env::var("DLCAPTURE_RETRY_MS") {
            let ms = ms
                .parse::<u64>()
                .map_err(|e| Error::config(format!("DLCAPTURE_RETRY_MS: {}", e)))?;
            config = config.retry_delay(Duration::from_millis(ms));
        }
        if let Ok(path) = std::env::var("DLCAPTURE_STORE") {
            config = config.store_path(path);
        }

        Ok(config)
    }

    /// Set the URL match pattern
    pub fn url_pattern(mut self, pattern: &str) -> Result<Self> {
        self.url_pattern = MatchPattern::parse(pattern)?;
        Ok(self)
    }

    /// Set the captured method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_ascii_uppercase();
        self
    }

    /// Set the cookie domain
    pub fn cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = domain.into();
        self
    }

    /// Set pending header retention
    pub fn header_retention(mut self, retention: Duration) -> Self {
        self.header_retention = retention;
        self
    }

    /// Set correlation retry delay
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set notification channel capacity
    pub fn notify_capacity(mut self, capacity: usize) -> Self {
        self.notify_capacity = capacity.max(1);
        self
    }

    /// Set the CLI store path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}
