// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Two-phase request capture
//!
//! The header phase parks the filtered headers under the request id; the
//! body phase claims them, adds the payload and cookies, and overwrites the
//! single `lastRequest` record.

mod body_observer;
mod capturer;
mod header_observer;
mod latest;
mod notify;
mod record;
mod stats;

pub use body_observer::{extract_payload, BodyCaptureObserver, BodyCaptureSettings};
pub use capturer::Capturer;
pub use header_observer::HeaderCaptureObserver;
pub use latest::LatestCapture;
pub use notify::CaptureNotifier;
pub use record::{
    now_millis, pending_key, CaptureMessage, CaptureRecord, CapturedData, PendingCapture,
    StoredHeaders, LAST_REQUEST_KEY, PENDING_KEY_PREFIX,
};
pub use stats::{CaptureStats, StatsSnapshot};
