use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    models::greeting::{GreetingEntry, GreetingRecord},
    services::greetings::GreetingReader,
};

/// The greeting list shown under the form.
///
/// Holds the result of the last successful read. A failed read is logged
/// and otherwise ignored; the previous list stays in place.
pub struct GreetingFeed {
    reader: Arc<dyn GreetingReader>,
    greetings: Vec<GreetingRecord>,
}

impl GreetingFeed {
    pub fn new(reader: Arc<dyn GreetingReader>) -> Self {
        Self {
            reader,
            greetings: Vec::new(),
        }
    }

    /// Initial read when the page is opened.
    pub async fn activate(&mut self) {
        self.load().await;
    }

    pub async fn refetch(&mut self) {
        self.load().await;
    }

    async fn load(&mut self) {
        match self.reader.fetch_all().await {
            Ok(greetings) => self.greetings = greetings,
            Err(e) => tracing::warn!("Failed to load greetings: {e}"),
        }
    }

    pub fn greetings(&self) -> &[GreetingRecord] {
        &self.greetings
    }

    /// Greetings in server order with display timestamps resolved against `now`.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<GreetingEntry> {
        self.greetings.iter().map(|g| g.to_entry(now)).collect()
    }
}
