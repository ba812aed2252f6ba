// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # dlcapture - Download Request Capture
//!
//! Captures one kind of outbound request, a POST to a file-download
//! endpoint, and stages its cookie, payload and headers for an operator to
//! paste into a command-line downloader.
//!
//! ## How it works
//!
//! - The host (browser, headless engine, proxy) drives an
//!   [`ObserverRegistry`] with two events per request.
//! - Header phase: the filtered headers are parked under
//!   `req_headers_<request id>` and expire after 30 seconds.
//! - Body phase: the payload is extracted, the parked headers are claimed
//!   (one retry after 50 ms), the target domain's cookies are attached and
//!   the single `lastRequest` record is overwritten.
//! - Listeners get a `requestCaptured` broadcast; having none is fine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dlcapture::{CaptureConfig, Capturer, CookieJar, MemoryStore, RequestBody, RequestDetails};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let capturer = Capturer::new(
//!         CaptureConfig::default(),
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(CookieJar::new()),
//!     );
//!     let registry = capturer.registry();
//!
//!     let url = "https://opensource.samsung.com/downSrcCode";
//!     registry
//!         .dispatch_headers(&RequestDetails::post("1", url)?.header("Referer", url))
//!         .await;
//!     registry
//!         .dispatch_body(&RequestDetails::post("1", url)?.body(RequestBody::form([("id", "7")])))
//!         .await;
//!
//!     if let Some(record) = capturer.last_capture().await? {
//!         println!("payload: {}", record.payload);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod handoff;
pub mod http;
pub mod network;
pub mod replay;
pub mod store;

// Re-exports for convenience

// Capture
pub use capture::{
    BodyCaptureObserver, CaptureMessage, CaptureNotifier, CaptureRecord, CapturedData, Capturer,
    HeaderCaptureObserver, LatestCapture, PendingCapture, StatsSnapshot,
};

// Config
pub use config::CaptureConfig;

// Errors
pub use error::{Error, ErrorContext, Result};

// Hand-off
pub use handoff::{CaptureSummary, HandoffBundle};

// HTTP
pub use http::{
    Cookie, CookieJar, CookieSource, FormField, HeaderEntry, HeaderSet, RequestBody, UploadData,
};

// Network
pub use network::{MatchPattern, NetworkObserver, ObserverRegistry, RequestDetails, RequestFilter};

// Replay
pub use replay::{ReplayOutcome, Replayer};

// Storage
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// dlcapture version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
