use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::FormError;

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 100;
pub const MESSAGE_MAX_LEN: usize = 2000;

/// Text fields of the RSVP form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Message,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Message => "message",
        };
        write!(f, "{s}")
    }
}

impl Field {
    pub fn max_len(self) -> usize {
        match self {
            Field::Name => NAME_MAX_LEN,
            Field::Phone => PHONE_MAX_LEN,
            Field::Message => MESSAGE_MAX_LEN,
        }
    }
}

/// A greeting as served by the read endpoint. `createdAt` is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GreetingRecord {
    pub name: String,
    pub message: String,
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl GreetingRecord {
    /// Resolves the display timestamp, substituting `now` when the server sent
    /// none or something that is not RFC 3339.
    pub fn to_entry(&self, now: DateTime<Utc>) -> GreetingEntry {
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        GreetingEntry {
            name: self.name.clone(),
            message: self.message.clone(),
            present: self.present,
            created_at,
        }
    }
}

/// A greeting ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GreetingEntry {
    pub name: String,
    pub message: String,
    pub present: bool,
    pub created_at: DateTime<Utc>,
}

impl GreetingEntry {
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Body of the write endpoint. Never carries a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GreetingSubmission {
    pub name: String,
    pub phone: String,
    pub message: String,
    pub present: bool,
}

impl GreetingSubmission {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for field in [Field::Name, Field::Phone, Field::Message] {
            let value = self.value(field);
            if value.trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
            if value.chars().count() > field.max_len() {
                return Err(FormError::TooLong {
                    field,
                    max: field.max_len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendResult {
    pub success: bool,
}

impl SendResult {
    pub const ACCEPTED: SendResult = SendResult { success: true };
    pub const REJECTED: SendResult = SendResult { success: false };
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GreetingRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub present: bool,
    pub created_at: DateTime<Utc>,
}

impl From<GreetingRow> for GreetingRecord {
    fn from(row: GreetingRow) -> Self {
        Self {
            name: row.name,
            message: row.message,
            present: row.present,
            created_at: Some(row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub total: usize,
    pub attending: usize,
    pub declined: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[GreetingRecord]) -> Self {
        let attending = records.iter().filter(|r| r.present).count();
        Self {
            total: records.len(),
            attending,
            declined: records.len() - attending,
        }
    }
}
