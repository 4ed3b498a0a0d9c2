use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entities::{business, call, technician};

/// Seed the totals gauges from the database at startup.
pub async fn init_metrics(db: &DatabaseConnection) {
    let business_count = business::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("hvac_businesses_total").set(business_count as f64);

    let tech_count = technician::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("hvac_technicians_total").set(tech_count as f64);

    let call_count = call::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("hvac_calls_total").set(call_count as f64);

    tracing::info!(
        "Initialized metrics: Businesses={}, Technicians={}, Calls={}",
        business_count,
        tech_count,
        call_count
    );
}

pub fn increment_calls_received() {
    metrics::gauge!("hvac_calls_total").increment(1.0);
}

pub fn increment_dispatches(priority: &str) {
    metrics::counter!("hvac_dispatches_total", "priority" => priority.to_string()).increment(1);
}

pub fn increment_escalations() {
    metrics::counter!("hvac_escalations_total").increment(1);
}

pub fn increment_notifications_sent(channel: &str) {
    metrics::counter!("hvac_notifications_sent_total", "channel" => channel.to_string())
        .increment(1);
}

pub fn increment_notifications_failed(channel: &str) {
    metrics::counter!("hvac_notifications_failed_total", "channel" => channel.to_string())
        .increment(1);
}

/// Seconds between a dispatch page going out and the technician accepting.
pub fn record_acknowledgment_time(seconds: f64) {
    metrics::histogram!("hvac_dispatch_acknowledgment_duration_seconds").record(seconds);
}
