use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    error::GreetingError,
    models::greeting::{GreetingSubmission, SendResult},
    services::greetings::GreetingWriter,
};

/// Shared view of whether a submission is in flight. Counts overlapping
/// sends so the flag stays raised until the last one settles.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    fn begin(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self.clone())
    }
}

/// Releases one in-flight slot when the request settles or its future is dropped.
struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        (self.0).0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Sends one greeting at a time through the configured writer.
pub struct GreetingSender {
    writer: Arc<dyn GreetingWriter>,
    loading: LoadingFlag,
}

impl GreetingSender {
    pub fn new(writer: Arc<dyn GreetingWriter>) -> Self {
        Self {
            writer,
            loading: LoadingFlag::default(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// `Ok` with `success: false` for refusals the backend reported;
    /// `Err` only when the backend could not be reached or understood.
    pub async fn send(&self, payload: &GreetingSubmission) -> Result<SendResult, GreetingError> {
        let _guard = self.loading.begin();
        self.writer.submit(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use tokio::sync::Notify;

    /// Holds every submission until released.
    struct GatedWriter {
        entered: Notify,
        release: Notify,
    }

    impl GreetingWriter for GatedWriter {
        fn submit<'a>(
            &'a self,
            _greeting: &'a GreetingSubmission,
        ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
            Box::pin(async move {
                self.entered.notify_one();
                self.release.notified().await;
                Ok(SendResult::REJECTED)
            })
        }
    }

    fn payload() -> GreetingSubmission {
        GreetingSubmission {
            name: "Alice".into(),
            phone: "08123".into(),
            message: "Congrats!".into(),
            present: true,
        }
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let writer = Arc::new(GatedWriter {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let sender = GreetingSender::new(writer.clone());
        let flag = sender.loading_flag();
        assert!(!sender.loading());

        let payload = payload();
        let (result, ()) = tokio::join!(sender.send(&payload), async {
            writer.entered.notified().await;
            assert!(flag.is_loading());
            writer.release.notify_one();
        });

        assert!(!result.unwrap().success);
        assert!(!sender.loading());
    }

    /// Gates the greetings named "first" and everything else independently.
    struct TwoGateWriter {
        first_entered: Notify,
        second_entered: Notify,
        release_first: Notify,
        release_second: Notify,
    }

    impl GreetingWriter for TwoGateWriter {
        fn submit<'a>(
            &'a self,
            greeting: &'a GreetingSubmission,
        ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
            Box::pin(async move {
                if greeting.name == "first" {
                    self.first_entered.notify_one();
                    self.release_first.notified().await;
                } else {
                    self.second_entered.notify_one();
                    self.release_second.notified().await;
                }
                Ok(SendResult::ACCEPTED)
            })
        }
    }

    #[tokio::test]
    async fn test_overlapping_sends_keep_loading_until_last_settles() {
        let writer = Arc::new(TwoGateWriter {
            first_entered: Notify::new(),
            second_entered: Notify::new(),
            release_first: Notify::new(),
            release_second: Notify::new(),
        });
        let sender = GreetingSender::new(writer.clone());
        let first = GreetingSubmission {
            name: "first".into(),
            ..payload()
        };
        let second = GreetingSubmission {
            name: "second".into(),
            ..payload()
        };

        let first_send = sender.send(&first);
        let second_send = sender.send(&second);
        tokio::pin!(first_send, second_send);

        tokio::select! {
            _ = &mut first_send => panic!("first send settled before release"),
            _ = &mut second_send => panic!("second send settled before release"),
            _ = async {
                writer.first_entered.notified().await;
                writer.second_entered.notified().await;
            } => {}
        }
        assert!(sender.loading());

        writer.release_first.notify_one();
        tokio::select! {
            result = &mut first_send => assert!(result.unwrap().success),
            _ = &mut second_send => panic!("second send settled before release"),
        }
        assert!(sender.loading());

        writer.release_second.notify_one();
        assert!(second_send.await.unwrap().success);
        assert!(!sender.loading());
    }

    #[tokio::test]
    async fn test_dropped_request_clears_loading() {
        let writer = Arc::new(GatedWriter {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let sender = GreetingSender::new(writer.clone());
        let payload = payload();

        {
            let send = sender.send(&payload);
            tokio::pin!(send);
            tokio::select! {
                _ = &mut send => panic!("writer was never released"),
                _ = writer.entered.notified() => assert!(sender.loading()),
            }
        }

        assert!(!sender.loading());
    }
}
