use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;

use crate::{
    error::FormError,
    middleware::rate_limit::check_submit_rate,
    rsvp::{Notifier, RsvpForm, RsvpPage, SubmitOutcome, ToastQueue, FAILURE_TOAST},
    services::metrics,
    views::{self, rsvp::RsvpView},
    AppState,
};

pub async fn index() -> Redirect {
    Redirect::to("/couple")
}

pub async fn couple() -> Html<String> {
    metrics::record_page_view("couple");
    Html(views::layout("The Couple", &views::couple::render(), &[]))
}

pub async fn rsvp(State(state): State<AppState>) -> Html<String> {
    metrics::record_page_view("rsvp");
    let toasts = Arc::new(ToastQueue::default());
    let mut page = state.rsvp_page(toasts.clone());
    page.mount().await;
    Html(render(&state, &page, &toasts, None))
}

pub async fn submit_rsvp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RsvpForm>,
) -> Html<String> {
    let toasts = Arc::new(ToastQueue::default());
    let mut page = state.rsvp_page(toasts.clone()).with_form(form);

    if let Err((status, _)) = check_submit_rate(&state, &headers).await {
        tracing::warn!("RSVP submit refused ({status})");
        toasts.error(FAILURE_TOAST);
        page.mount().await;
        return Html(render(&state, &page, &toasts, None));
    }

    // A successful submit already refetched the list.
    let form_error = match page.submit().await {
        SubmitOutcome::Succeeded => None,
        SubmitOutcome::Failed => {
            page.mount().await;
            None
        }
        SubmitOutcome::Blocked(e) => {
            page.mount().await;
            Some(e)
        }
    };
    Html(render(&state, &page, &toasts, form_error.as_ref()))
}

fn render(
    state: &AppState,
    page: &RsvpPage,
    toasts: &ToastQueue,
    form_error: Option<&FormError>,
) -> String {
    let entries = page.feed().entries(Utc::now());
    let body = views::rsvp::render(&RsvpView {
        form: page.form(),
        loading: page.sender().loading(),
        entries: &entries,
        form_error,
        offset: state.display_offset(),
    });
    views::layout("RSVP", &body, &toasts.drain())
}
