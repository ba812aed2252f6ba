// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for dlcapture
//!
//! Observer hooks never hand these back to the host. They surface at the
//! capture-attempt boundary, get logged there, and the attempt is dropped.

use thiserror::Error;

/// Result type alias for dlcapture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dlcapture
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value store failed
    #[error("Storage error on '{key}': {reason}")]
    Storage { key: String, reason: String },

    /// Cookie source failed
    #[error("Cookie query for {domain} failed: {reason}")]
    Cookie { domain: String, reason: String },

    /// Request body could not be decoded
    #[error("Body decode error: {0}")]
    Decode(String),

    /// Hand-off blob could not be parsed
    #[error("Invalid hand-off blob: {0}")]
    Handoff(String),

    /// No capture has been recorded yet
    #[error("No request captured yet")]
    NothingCaptured,

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP replay failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Replay got a non-success response
    #[error("Replay of {url} returned status {status}")]
    ReplayStatus { url: String, status: u16 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Storage {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a cookie error
    pub fn cookie(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Cookie {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Error::Decode(msg.into())
    }

    /// Create a hand-off error
    pub fn handoff<S: Into<String>>(msg: S) -> Self {
        Error::Handoff(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this came from a host service (store or cookie source)
    pub fn is_host_service(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Cookie { .. })
    }

    /// Get the store key if this is a storage error
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Storage { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach the store key an operation was working on
    fn with_key(self, key: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_key(self, key: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::Storage { reason, .. } => Error::Storage {
                key: key.to_string(),
                reason,
            },
            other => Error::storage(key, other.to_string()),
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error() {
        let err = Error::storage("lastRequest", "disk full");

        assert!(err.is_host_service());
        assert_eq!(err.key(), Some("lastRequest"));
        assert_eq!(err.to_string(), "Storage error on 'lastRequest': disk full");
    }

    #[test]
    fn test_with_key_wraps_foreign_errors() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io.with_key("req_headers_7").unwrap_err();

        assert_eq!(err.key(), Some("req_headers_7"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_context() {
        let res: Result<()> = Err(Error::config("bad pattern"));
        let err = res.context("replay target").unwrap_err();
        assert_eq!(
            err.to_string(),
            "replay target: Configuration error: bad pattern"
        );
        assert!(!err.is_host_service());
    }
}
