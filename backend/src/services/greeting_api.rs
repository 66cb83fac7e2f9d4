use futures_util::future::BoxFuture;
use reqwest::Client;

use crate::{
    error::GreetingError,
    models::greeting::{GreetingRecord, GreetingSubmission, SendResult},
    services::greetings::{GreetingReader, GreetingWriter},
};

/// Talks to a greeting API served elsewhere (`/api/greetings`).
pub struct HttpGreetingClient {
    client: Client,
    base_url: String,
}

impl HttpGreetingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/greetings", self.base_url)
    }
}

impl GreetingReader for HttpGreetingClient {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<GreetingRecord>, GreetingError>> {
        Box::pin(async move {
            let response = self.client.get(self.endpoint()).send().await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(GreetingError::Rejected { status, body });
            }

            Ok(response.json::<Vec<GreetingRecord>>().await?)
        })
    }
}

impl GreetingWriter for HttpGreetingClient {
    fn submit<'a>(
        &'a self,
        greeting: &'a GreetingSubmission,
    ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint())
                .json(greeting)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            // Error statuses usually still carry `{"success": false}`.
            match serde_json::from_str::<SendResult>(&body) {
                Ok(result) if status.is_success() => Ok(result),
                Ok(_) => {
                    tracing::warn!("Greeting API refused submission ({status}): {body}");
                    Ok(SendResult::REJECTED)
                }
                Err(_) => Err(GreetingError::Rejected {
                    status: status.as_u16(),
                    body,
                }),
            }
        })
    }
}
