use std::sync::Arc;

use crate::{
    error::FormError,
    models::greeting::Field,
    rsvp::{feed::GreetingFeed, form::RsvpForm, notifier::Notifier, sender::GreetingSender},
    services::greetings::{GreetingReader, GreetingWriter},
};

pub const SUCCESS_TOAST: &str = "Pesan Berhasil Dikirim";
pub const FAILURE_TOAST: &str = "Gagal Mengirim Pesan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form reset, success toast raised, list refetched.
    Succeeded,
    /// Failure toast raised, form untouched.
    Failed,
    /// A required field is missing; nothing was sent.
    Blocked(FormError),
}

/// State behind the RSVP page: the form, the greeting list and the submit workflow.
pub struct RsvpPage {
    form: RsvpForm,
    sender: GreetingSender,
    feed: GreetingFeed,
    notifier: Arc<dyn Notifier>,
}

impl RsvpPage {
    pub fn new(
        reader: Arc<dyn GreetingReader>,
        writer: Arc<dyn GreetingWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            form: RsvpForm::new(),
            sender: GreetingSender::new(writer),
            feed: GreetingFeed::new(reader),
            notifier,
        }
    }

    /// Starts from values the visitor already typed.
    pub fn with_form(mut self, form: RsvpForm) -> Self {
        self.form = form;
        self
    }

    pub async fn mount(&mut self) {
        self.feed.activate().await;
    }

    pub fn form(&self) -> &RsvpForm {
        &self.form
    }

    pub fn feed(&self) -> &GreetingFeed {
        &self.feed
    }

    pub fn sender(&self) -> &GreetingSender {
        &self.sender
    }

    pub fn update(&mut self, field: Field, value: impl Into<String>) {
        self.form = self.form.with_field(field, value);
    }

    pub fn set_present(&mut self, present: bool) {
        self.form = self.form.with_present(present);
    }

    pub fn phase(&self) -> SubmitPhase {
        if self.sender.loading() {
            SubmitPhase::Submitting
        } else {
            SubmitPhase::Idle
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let payload = match self.form.to_submission() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("RSVP submit blocked: {e}");
                return SubmitOutcome::Blocked(e);
            }
        };

        match self.sender.send(&payload).await {
            Ok(result) if result.success => {
                self.form = RsvpForm::after_success();
                self.notifier.success(SUCCESS_TOAST);
                self.feed.refetch().await;
                SubmitOutcome::Succeeded
            }
            Ok(_) => {
                self.notifier.error(FAILURE_TOAST);
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("RSVP submit failed: {e}");
                self.notifier.error(FAILURE_TOAST);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GreetingError,
        models::greeting::{GreetingRecord, GreetingSubmission, SendResult},
        rsvp::notifier::{ToastKind, ToastQueue},
        services::greetings::GreetingBackend,
    };
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct CountingReader {
        calls: AtomicUsize,
        records: Vec<GreetingRecord>,
    }

    impl CountingReader {
        fn new(records: Vec<GreetingRecord>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GreetingReader for CountingReader {
        fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<GreetingRecord>, GreetingError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let records = self.records.clone();
            Box::pin(async move { Ok(records) })
        }
    }

    enum Reply {
        Accept,
        Refuse,
        Unreachable,
    }

    struct FakeWriter {
        reply: Reply,
        sent: std::sync::Mutex<Vec<GreetingSubmission>>,
    }

    impl FakeWriter {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                sent: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl GreetingWriter for FakeWriter {
        fn submit<'a>(
            &'a self,
            greeting: &'a GreetingSubmission,
        ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
            self.sent.lock().unwrap().push(greeting.clone());
            Box::pin(async move {
                match self.reply {
                    Reply::Accept => Ok(SendResult::ACCEPTED),
                    Reply::Refuse => Ok(SendResult::REJECTED),
                    Reply::Unreachable => Err(GreetingError::Rejected {
                        status: 502,
                        body: "bad gateway".into(),
                    }),
                }
            })
        }
    }

    fn filled(page: &mut RsvpPage) {
        page.update(Field::Name, "Alice");
        page.update(Field::Phone, "08123");
        page.update(Field::Message, "Congrats!");
        page.set_present(true);
    }

    fn page_with(
        reply: Reply,
    ) -> (RsvpPage, Arc<CountingReader>, Arc<FakeWriter>, Arc<ToastQueue>) {
        let reader = Arc::new(CountingReader::new(vec![]));
        let writer = Arc::new(FakeWriter::new(reply));
        let toasts = Arc::new(ToastQueue::default());
        let page = RsvpPage::new(reader.clone(), writer.clone(), toasts.clone());
        (page, reader, writer, toasts)
    }

    #[tokio::test]
    async fn test_success_resets_form_toasts_once_and_refetches_once() {
        let (mut page, reader, writer, toasts) = page_with(Reply::Accept);
        page.mount().await;
        filled(&mut page);

        assert_eq!(page.submit().await, SubmitOutcome::Succeeded);

        assert_eq!(page.form(), &RsvpForm::after_success());
        assert_eq!(writer.sent(), 1);
        assert_eq!(reader.calls(), 2);
        let raised = toasts.drain();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, ToastKind::Success);
        assert_eq!(raised[0].message, SUCCESS_TOAST);
        assert_eq!(page.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_refused_submission_keeps_form_and_skips_refetch() {
        let (mut page, reader, _writer, toasts) = page_with(Reply::Refuse);
        page.mount().await;
        filled(&mut page);
        let before = page.form().clone();

        assert_eq!(page.submit().await, SubmitOutcome::Failed);

        assert_eq!(page.form(), &before);
        assert_eq!(reader.calls(), 1);
        let raised = toasts.drain();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, ToastKind::Error);
        assert_eq!(raised[0].message, FAILURE_TOAST);
    }

    #[tokio::test]
    async fn test_transport_error_is_treated_as_failure() {
        let (mut page, reader, _writer, toasts) = page_with(Reply::Unreachable);
        filled(&mut page);
        let before = page.form().clone();

        assert_eq!(page.submit().await, SubmitOutcome::Failed);

        assert_eq!(page.form(), &before);
        assert_eq!(reader.calls(), 0);
        assert_eq!(toasts.drain().len(), 1);
        assert_eq!(page.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_empty_message_is_blocked_before_sending() {
        let (mut page, reader, writer, toasts) = page_with(Reply::Accept);
        filled(&mut page);
        page.update(Field::Message, "");

        assert_eq!(
            page.submit().await,
            SubmitOutcome::Blocked(FormError::MissingField(Field::Message))
        );
        assert_eq!(writer.sent(), 0);
        assert_eq!(reader.calls(), 0);
        assert!(toasts.drain().is_empty());
    }

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
                Ok(SendResult::ACCEPTED)
            })
        }
    }

    #[tokio::test]
    async fn test_submitting_phase_while_write_in_flight() {
        let writer = Arc::new(GatedWriter {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let reader = Arc::new(CountingReader::new(vec![]));
        let mut page = RsvpPage::new(reader, writer.clone(), Arc::new(ToastQueue::default()));
        filled(&mut page);
        let loading = page.sender().loading_flag();

        let (outcome, ()) = tokio::join!(page.submit(), async {
            writer.entered.notified().await;
            assert!(loading.is_loading());
            writer.release.notify_one();
        });

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert!(!loading.is_loading());
    }

    #[tokio::test]
    async fn test_submitted_greeting_appears_after_refetch() {
        let backend = GreetingBackend::memory();
        let toasts = Arc::new(ToastQueue::default());
        let mut page = RsvpPage::new(backend.reader.clone(), backend.writer.clone(), toasts);
        page.mount().await;
        assert!(page.feed().greetings().is_empty());

        filled(&mut page);
        assert_eq!(page.submit().await, SubmitOutcome::Succeeded);

        let greetings = page.feed().greetings();
        assert!(greetings
            .iter()
            .any(|g| g.name == "Alice" && g.message == "Congrats!"));
    }
}
