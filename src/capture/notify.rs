// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fire-and-forget capture notifications

use tokio::sync::broadcast;

use super::record::CaptureMessage;

/// Broadcasts capture messages to zero or more listeners
#[derive(Debug, Clone)]
pub struct CaptureNotifier {
    sender: broadcast::Sender<CaptureMessage>,
}

impl CaptureNotifier {
    /// Create a notifier buffering up to `capacity` messages per listener
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Listen for future messages
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureMessage> {
        self.sender.subscribe()
    }

    /// Current listener count
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish a message; returns how many listeners received it
    ///
    /// Having no listener is not a failure.
    pub fn publish(&self, message: CaptureMessage) -> usize {
        match self.sender.send(message) {
            Ok(n) => n,
            Err(_) => {
                tracing::debug!("No capture listeners, notification dropped");
                0
            }
        }
    }
}

impl Default for CaptureNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::record::CapturedData;
    use crate::http::HeaderSet;

    fn message() -> CaptureMessage {
        CaptureMessage::RequestCaptured(CapturedData {
            cookie: "a=1".into(),
            payload: "p".into(),
            headers: HeaderSet::new(),
        })
    }

    #[test]
    fn test_publish_without_listeners() {
        let notifier = CaptureNotifier::default();
        assert_eq!(notifier.listener_count(), 0);
        assert_eq!(notifier.publish(message()), 0);
    }

    #[tokio::test]
    async fn test_publish_to_listeners() {
        let notifier = CaptureNotifier::new(4);
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        assert_eq!(notifier.publish(message()), 2);
        assert_eq!(a.recv().await.unwrap(), message());
        assert_eq!(b.recv().await.unwrap(), message());
    }
}
