//! The RSVP page model: form state, the send and feed hooks, and the
//! submission workflow tying them together.

pub mod feed;
pub mod form;
pub mod notifier;
pub mod page;
pub mod sender;

pub use feed::GreetingFeed;
pub use form::RsvpForm;
pub use notifier::{Notifier, Toast, ToastKind, ToastQueue};
pub use page::{RsvpPage, SubmitOutcome, SubmitPhase, FAILURE_TOAST, SUCCESS_TOAST};
pub use sender::{GreetingSender, LoadingFlag};
