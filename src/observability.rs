use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "hotdesk_bookings_created_total";

/// Counter: bookings rescheduled.
pub const BOOKINGS_RESCHEDULED_TOTAL: &str = "hotdesk_bookings_rescheduled_total";

/// Counter: bookings deleted.
pub const BOOKINGS_DELETED_TOTAL: &str = "hotdesk_bookings_deleted_total";

/// Counter: create/update attempts rejected by the overlap scan.
pub const BOOKING_CONFLICTS_TOTAL: &str = "hotdesk_booking_conflicts_total";

/// Counter: failed token authentications.
pub const AUTH_FAILURES_TOTAL: &str = "hotdesk_auth_failures_total";

/// Counter: reminders delivered by the notifier.
pub const NOTIFICATIONS_SENT_TOTAL: &str = "hotdesk_notifications_sent_total";

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
