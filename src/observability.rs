use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings committed.
pub const BOOKINGS_CREATED_TOTAL: &str = "slotwise_bookings_created_total";

/// Counter: creations rejected because the slot was taken.
pub const BOOKING_CONFLICTS_TOTAL: &str = "slotwise_booking_conflicts_total";

/// Counter: bookings cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "slotwise_bookings_cancelled_total";

/// Counter: privileged direct status overwrites.
pub const STATUS_OVERRIDES_TOTAL: &str = "slotwise_status_overrides_total";

/// Counter: payment status updates recorded.
pub const PAYMENT_UPDATES_TOTAL: &str = "slotwise_payment_updates_total";

/// Counter: availability queries served.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "slotwise_availability_queries_total";

/// Histogram: slot-generation duration in seconds.
pub const SLOT_GENERATION_DURATION_SECONDS: &str = "slotwise_slot_generation_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Counter: store round-trips that exceeded their bound.
pub const STORE_TIMEOUTS_TOTAL: &str = "slotwise_store_timeouts_total";

/// Counter: notifications dropped for lack of subscribers.
pub const NOTIFICATIONS_DROPPED_TOTAL: &str = "slotwise_notifications_dropped_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
