pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod rsvp;
pub mod services;
pub mod views;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use chrono::{FixedOffset, Offset, Utc};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use rsvp::{Notifier, RsvpPage};
use services::{email::EmailService, greetings::GreetingBackend, submissions::TrackedWriter};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub greetings: GreetingBackend,
    pub redis: Option<redis::aio::MultiplexedConnection>,
}

impl AppState {
    /// Wraps the backend writer so every accepted greeting is counted and,
    /// with SMTP configured, mailed to the couple.
    pub fn new(config: Config, greetings: GreetingBackend) -> Self {
        let email = EmailService::new(&config).map(Arc::new);
        let writer = Arc::new(TrackedWriter::new(greetings.writer.clone(), email));
        Self {
            config: Arc::new(config),
            greetings: greetings.with_writer(writer),
            redis: None,
        }
    }

    pub fn with_redis(mut self, redis: redis::aio::MultiplexedConnection) -> Self {
        self.redis = Some(redis);
        self
    }

    /// A fresh RSVP page wired to the configured backend.
    pub fn rsvp_page(&self, notifier: Arc<dyn Notifier>) -> RsvpPage {
        RsvpPage::new(
            self.greetings.reader.clone(),
            self.greetings.writer.clone(),
            notifier,
        )
    }

    pub fn display_offset(&self) -> FixedOffset {
        self.config
            .display_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// API CORS: the site origin, plus localhost for development.
fn cors_layer(base_url: &str) -> CorsLayer {
    let base = base_url.to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_origin(origin)
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/greetings",
            get(routes::greetings::list_greetings).post(routes::greetings::create_greeting),
        )
        .route("/greetings/summary", get(routes::greetings::attendance_summary))
        .layer(cors_layer(&state.config.app_base_url));

    Router::new()
        .route("/", get(routes::pages::index))
        .route("/couple", get(routes::pages::couple))
        .route("/rsvp", get(routes::pages::rsvp).post(routes::pages::submit_rsvp))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .nest("/api", api)
        .nest_service("/assets", ServeDir::new(&state.config.assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
