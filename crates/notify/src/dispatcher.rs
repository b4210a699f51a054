//! Fans a payload out to every configured channel.
//!
//! Individual channel failures don't block other channels, and none of
//! them fail the invocation: by the time the dispatcher runs, the tick
//! has already failed and this is the last-gasp report.

use crate::traits::{ErrorPayload, Notifier};

/// Delivers payloads to all configured channels, best-effort.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher over a fixed set of channels.
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create a dispatcher with no channels (delivery becomes a no-op).
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver the payload to every channel. Returns how many deliveries
    /// succeeded. Failures are logged and swallowed.
    pub async fn dispatch(&self, payload: &ErrorPayload) -> usize {
        if self.channels.is_empty() {
            tracing::warn!("no notification channels configured, dropping payload");
            return 0;
        }

        let mut delivered = 0;

        for channel in &self.channels {
            match channel.send(payload).await {
                Ok(()) => {
                    tracing::info!(
                        channel = channel.channel_name(),
                        "notification delivered"
                    );
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.channel_name(),
                        error = %e,
                        "notification delivery failed"
                    );
                }
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NotifyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _payload: &ErrorPayload) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test]
    async fn dispatch_to_all_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            Box::new(MockNotifier {
                name: "a".to_string(),
                send_count: count_a.clone(),
                should_fail: false,
            }),
            Box::new(MockNotifier {
                name: "b".to_string(),
                send_count: count_b.clone(),
                should_fail: false,
            }),
        ]);

        let payload = ErrorPayload::error("offhours", "test");
        let delivered = dispatcher.dispatch(&payload).await;

        assert_eq!(delivered, 2);
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let count = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            Box::new(MockNotifier {
                name: "fail".to_string(),
                send_count: Arc::new(AtomicUsize::new(0)),
                should_fail: true,
            }),
            Box::new(MockNotifier {
                name: "ok".to_string(),
                send_count: count.clone(),
                should_fail: false,
            }),
        ]);

        let payload = ErrorPayload::error("offhours", "test");
        let delivered = dispatcher.dispatch(&payload).await;

        assert_eq!(delivered, 1);
        assert_eq!(count.load(Ordering::SeqCst), 1); // second channel still sent
    }

    #[tokio::test]
    async fn empty_dispatcher_is_a_noop() {
        let dispatcher = Dispatcher::empty();
        assert!(dispatcher.is_empty());
        let payload = ErrorPayload::error("offhours", "test");
        assert_eq!(dispatcher.dispatch(&payload).await, 0);
    }
}
