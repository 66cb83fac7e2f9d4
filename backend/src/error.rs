use crate::models::greeting::Field;

/// Failures talking to the greeting backend.
///
/// A request the backend answered with `{"success": false}` is not an error;
/// it comes back as a rejected `SendResult`.
#[derive(Debug, thiserror::Error)]
pub enum GreetingError {
    #[error("greeting service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("greeting service answered {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("greeting store failure: {0}")]
    Store(#[from] sqlx::Error),
}

/// Client-side validation of the RSVP form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(Field),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },
}
