use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::model::{BookingId, Ms, UserId};
use crate::observability;

/// Delivery channel for booking reminders. The daemon uses [`LogSink`];
/// a deployment would put a messenger client behind this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, user_id: UserId, booking_id: BookingId, start_time: Ms);
}

/// Sink that logs the reminder instead of sending it anywhere.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, user_id: UserId, booking_id: BookingId, start_time: Ms) {
        let at = DateTime::<Utc>::from_timestamp_millis(start_time)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| start_time.to_string());
        info!("reminder for user {user_id}: booking {booking_id} starts at {at}");
    }
}

/// Polls the pending-bookings read endpoint on a fixed interval and delivers
/// one reminder per booking id.
///
/// The de-duplication set lives for this process only and is never persisted;
/// a restart re-notifies everything still matching the predicate.
pub struct Notifier {
    engine: Arc<Engine>,
    sink: Arc<dyn NotificationSink>,
    sent: HashSet<BookingId>,
}

impl Notifier {
    pub fn new(engine: Arc<Engine>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            engine,
            sink,
            sent: HashSet::new(),
        }
    }

    /// One polling pass. Returns the number of reminders delivered.
    pub async fn poll_once(&mut self) -> usize {
        let pending = match self.engine.pending_bookings().await {
            Ok(pending) => pending,
            Err(e) => {
                debug!("notifier poll failed: {e}");
                return 0;
            }
        };

        let mut delivered = 0;
        for booking in pending {
            if self.sent.insert(booking.id) {
                self.sink
                    .deliver(booking.user_id, booking.id, booking.span.start)
                    .await;
                metrics::counter!(observability::NOTIFICATIONS_SENT_TOTAL).increment(1);
                delivered += 1;
            }
        }
        delivered
    }

    /// Poll forever on a fixed interval. No backpressure, no distributed
    /// locking — one notifier per process.
    pub async fn run(mut self, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            let delivered = self.poll_once().await;
            if delivered > 0 {
                info!("delivered {delivered} booking reminders");
            }
        }
    }
}
