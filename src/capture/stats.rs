// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Running counters for a capturer
#[derive(Debug, Default)]
pub struct CaptureStats {
    /// Records written
    captures: AtomicU64,
    /// Body events that found no stored headers
    header_misses: AtomicU64,
    /// Attempts abandoned on a store or cookie failure
    failures: AtomicU64,
}

/// Point-in-time copy of [`CaptureStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub captures: u64,
    pub header_misses: u64,
    pub failures: u64,
}

impl CaptureStats {
    pub fn record_capture(&self) {
        self.captures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_header_miss(&self) {
        self.header_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            captures: self.captures.load(Ordering::Relaxed),
            header_misses: self.header_misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = CaptureStats::default();
        stats.record_capture();
        stats.record_capture();
        stats.record_failure();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                captures: 2,
                header_misses: 0,
                failures: 1
            }
        );
    }
}
