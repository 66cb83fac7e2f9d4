use std::sync::Arc;

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge_vec, CounterVec, GaugeVec};
use tracing::{info, warn};

use crate::{models::greeting::AttendanceSummary, services::greetings::GreetingReader};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref GREETINGS_SUBMITTED_COUNTER: CounterVec = register_counter_vec!(
        "site_greetings_submitted_total",
        "Greeting submissions by outcome",
        &["status"]
    ).unwrap();

    pub static ref PAGE_VIEWS_COUNTER: CounterVec = register_counter_vec!(
        "site_page_views_total",
        "Rendered pages",
        &["page"]
    ).unwrap();

    // ── Guest list ──────────────────────────────────────────────────────────
    pub static ref GREETINGS_GAUGE: GaugeVec = register_gauge_vec!(
        "site_greetings_total",
        "Stored greetings by attendance",
        &["attendance"]
    ).unwrap();
}

pub fn record_submission(status: &str) {
    GREETINGS_SUBMITTED_COUNTER.with_label_values(&[status]).inc();
}

pub fn record_page_view(page: &str) {
    PAGE_VIEWS_COUNTER.with_label_values(&[page]).inc();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(reader: Arc<dyn GreetingReader>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(reader.as_ref()).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(reader: &dyn GreetingReader) -> anyhow::Result<()> {
    let records = reader.fetch_all().await?;
    let summary = AttendanceSummary::from_records(&records);

    GREETINGS_GAUGE
        .with_label_values(&["attending"])
        .set(summary.attending as f64);
    GREETINGS_GAUGE
        .with_label_values(&["declined"])
        .set(summary.declined as f64);

    info!("Metrics: collected {} greeting(s)", summary.total);
    Ok(())
}
