use serde::Deserialize;

use crate::{
    error::FormError,
    models::greeting::{Field, GreetingSubmission},
};

/// Values currently typed into the RSVP form.
///
/// Updates never mutate in place: every `with_*` call returns the next state.
/// Also the body of `POST /rsvp`; absent fields deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RsvpForm {
    pub name: String,
    pub phone: String,
    pub message: String,
    pub present: bool,
}

impl RsvpForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// State after an accepted submission: everything cleared, attendance preset to yes.
    pub fn after_success() -> Self {
        Self {
            present: true,
            ..Self::default()
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            Field::Name => next.name = value,
            Field::Phone => next.phone = value,
            Field::Message => next.message = value,
        }
        next
    }

    pub fn with_present(&self, present: bool) -> Self {
        Self {
            present,
            ..self.clone()
        }
    }

    pub fn to_submission(&self) -> Result<GreetingSubmission, FormError> {
        let submission = GreetingSubmission {
            name: self.name.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
            present: self.present,
        };
        submission.validate()?;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty_and_absent() {
        let form = RsvpForm::new();
        assert_eq!(form.value(Field::Name), "");
        assert!(!form.present);
    }

    #[test]
    fn test_updates_leave_previous_state_untouched() {
        let empty = RsvpForm::new();
        let named = empty.with_field(Field::Name, "Alice");
        let attending = named.with_present(true);

        assert_eq!(empty.name, "");
        assert_eq!(named.name, "Alice");
        assert!(!named.present);
        assert!(attending.present);
        assert_eq!(attending.name, "Alice");
    }

    #[test]
    fn test_attendance_choice_follows_last_selection() {
        let form = RsvpForm::new().with_present(true).with_present(false);
        assert!(!form.present);
        assert!(form.with_present(true).present);
    }

    #[test]
    fn test_reset_after_success_drops_contact_and_presets_attendance() {
        let reset = RsvpForm::after_success();
        assert_eq!(reset.phone, "");
        assert_eq!(reset.message, "");
        assert!(reset.present);
    }

    #[test]
    fn test_to_submission_requires_every_field() {
        let form = RsvpForm::new()
            .with_field(Field::Name, "Alice")
            .with_field(Field::Phone, "08123");
        assert_eq!(
            form.to_submission(),
            Err(FormError::MissingField(Field::Message))
        );

        let submission = form
            .with_field(Field::Message, "Congrats!")
            .with_present(true)
            .to_submission()
            .unwrap();
        assert_eq!(submission.name, "Alice");
        assert!(submission.present);
    }

    #[test]
    fn test_deserializes_posted_form() {
        let form: RsvpForm = serde_json::from_value(serde_json::json!({
            "name": "Alice",
            "present": true,
        }))
        .unwrap();
        assert_eq!(form.name, "Alice");
        assert_eq!(form.phone, "");
        assert!(form.present);
    }
}
