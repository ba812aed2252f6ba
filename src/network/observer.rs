// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network observation hooks
//!
//! The host (browser, headless engine, proxy) calls into an
//! [`ObserverRegistry`] at two points of every outbound request. Observers
//! only look; they cannot modify, delay or block the request.

use std::sync::Arc;

use async_trait::async_trait;

use super::{MatchPattern, RequestDetails};

/// Observer of outbound requests
///
/// # Example
///
/// ```rust,no_run
/// use dlcapture::network::{NetworkObserver, RequestDetails};
/// use async_trait::async_trait;
///
/// struct UrlLogger;
///
/// #[async_trait]
/// impl NetworkObserver for UrlLogger {
///     async fn on_before_headers_sent(&self, details: &RequestDetails) {
///         println!("{} {}", details.method, details.url);
///     }
/// }
/// ```
#[async_trait]
pub trait NetworkObserver: Send + Sync {
    /// Called when the host is about to send the request headers
    async fn on_before_headers_sent(&self, _details: &RequestDetails) {}

    /// Called when the host is about to send the request body
    async fn on_before_body_sent(&self, _details: &RequestDetails) {}

    /// Filter - return true if this observer wants the request
    fn should_observe(&self, _details: &RequestDetails) -> bool {
        true
    }

    /// Priority - higher priority observers run first
    fn priority(&self) -> i32 {
        0
    }
}

/// URL pattern plus method, the scope of a capture observer
#[derive(Debug, Clone)]
pub struct RequestFilter {
    pub pattern: MatchPattern,
    pub method: String,
}

impl RequestFilter {
    pub fn new(pattern: MatchPattern, method: impl Into<String>) -> Self {
        Self {
            pattern,
            method: method.into().to_ascii_uppercase(),
        }
    }

    pub fn matches(&self, details: &RequestDetails) -> bool {
        details.method.eq_ignore_ascii_case(&self.method) && self.pattern.matches(&details.url)
    }
}

/// Registry of observers the host dispatches to
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn NetworkObserver>>,
}

impl ObserverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn add<O: NetworkObserver + 'static>(&mut self, observer: O) {
        self.add_shared(Arc::new(observer));
    }

    /// Register an observer that is also held elsewhere
    pub fn add_shared(&mut self, observer: Arc<dyn NetworkObserver>) {
        self.observers.push(observer);
        // Stable sort keeps registration order within a priority
        self.observers.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver a header-phase event
    pub async fn dispatch_headers(&self, details: &RequestDetails) {
        for observer in &self.observers {
            if observer.should_observe(details) {
                observer.on_before_headers_sent(details).await;
            }
        }
    }

    /// Deliver a body-phase event
    pub async fn dispatch_body(&self, details: &RequestDetails) {
        for observer in &self.observers {
            if observer.should_observe(details) {
                observer.on_before_body_sent(details).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        name: &'static str,
        priority: i32,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NetworkObserver for Recorder {
        async fn on_before_headers_sent(&self, details: &RequestDetails) {
            self.seen
                .lock()
                .push(format!("{}:headers:{}", self.name, details.request_id));
        }

        async fn on_before_body_sent(&self, details: &RequestDetails) {
            self.seen
                .lock()
                .push(format!("{}:body:{}", self.name, details.request_id));
        }

        fn should_observe(&self, details: &RequestDetails) -> bool {
            details.method == "POST"
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[tokio::test]
    async fn test_dispatch_order_and_filter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.add(Recorder {
            name: "low",
            priority: -1,
            seen: seen.clone(),
        });
        registry.add(Recorder {
            name: "high",
            priority: 10,
            seen: seen.clone(),
        });
        assert_eq!(registry.len(), 2);

        let post = RequestDetails::post("1", "https://example.com/").unwrap();
        let get = RequestDetails::new("2", "GET", "https://example.com/").unwrap();

        registry.dispatch_headers(&post).await;
        registry.dispatch_headers(&get).await;
        registry.dispatch_body(&post).await;

        assert_eq!(
            *seen.lock(),
            vec!["high:headers:1", "low:headers:1", "high:body:1", "low:body:1"]
        );
    }

    #[test]
    fn test_request_filter() {
        let filter = RequestFilter::new(
            MatchPattern::parse("*://example.com/download").unwrap(),
            "post",
        );

        let post = RequestDetails::post("1", "https://example.com/download").unwrap();
        let get = RequestDetails::new("2", "GET", "https://example.com/download").unwrap();
        let other = RequestDetails::post("3", "https://example.com/other").unwrap();

        assert!(filter.matches(&post));
        assert!(!filter.matches(&get));
        assert!(!filter.matches(&other));
    }
}
