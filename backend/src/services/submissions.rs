use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{
    error::GreetingError,
    models::greeting::{GreetingSubmission, SendResult},
    services::{email::EmailService, greetings::GreetingWriter, metrics},
};

/// Wraps the backend writer: counts outcomes and, when SMTP is configured,
/// mails accepted greetings to the couple in the background.
pub struct TrackedWriter {
    inner: Arc<dyn GreetingWriter>,
    email: Option<Arc<EmailService>>,
}

impl TrackedWriter {
    pub fn new(inner: Arc<dyn GreetingWriter>, email: Option<Arc<EmailService>>) -> Self {
        Self { inner, email }
    }
}

impl GreetingWriter for TrackedWriter {
    fn submit<'a>(
        &'a self,
        greeting: &'a GreetingSubmission,
    ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
        Box::pin(async move {
            let result = self.inner.submit(greeting).await;

            match &result {
                Ok(r) if r.success => {
                    metrics::record_submission("accepted");
                    tracing::info!(
                        present = greeting.present,
                        "Greeting accepted from {}",
                        greeting.name
                    );

                    if let Some(email_svc) = self.email.clone() {
                        let greeting = greeting.clone();
                        tokio::spawn(async move {
                            if let Err(e) = email_svc.send_greeting_notice(&greeting).await {
                                tracing::warn!("Failed to mail greeting notice: {e}");
                            }
                        });
                    }
                }
                Ok(_) => {
                    metrics::record_submission("rejected");
                    tracing::warn!("Greeting from {} rejected by backend", greeting.name);
                }
                Err(e) => {
                    metrics::record_submission("error");
                    tracing::error!("Greeting from {} failed: {e}", greeting.name);
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::greetings::GreetingBackend;

    #[tokio::test]
    async fn test_passes_result_through() {
        let backend = GreetingBackend::memory();
        let writer = TrackedWriter::new(backend.writer.clone(), None);
        let greeting = GreetingSubmission {
            name: "Alice".into(),
            phone: "08123".into(),
            message: "Congrats!".into(),
            present: true,
        };

        let before = metrics::GREETINGS_SUBMITTED_COUNTER
            .with_label_values(&["accepted"])
            .get();
        assert!(writer.submit(&greeting).await.unwrap().success);
        let after = metrics::GREETINGS_SUBMITTED_COUNTER
            .with_label_values(&["accepted"])
            .get();

        assert!(after >= before + 1.0);
        assert_eq!(backend.reader.fetch_all().await.unwrap().len(), 1);
    }
}
