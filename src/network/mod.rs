// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network observation
//!
//! Abstract request-observation interface the host drives.

mod event;
mod observer;
mod pattern;

pub use event::RequestDetails;
pub use observer::{NetworkObserver, ObserverRegistry, RequestFilter};
pub use pattern::MatchPattern;
