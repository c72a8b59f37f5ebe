use std::collections::HashMap;

use crate::model::*;

/// In-memory booking table rebuilt from the WAL at startup.
///
/// Not internally synchronized — the engine serializes access through its
/// own lock, so every query here observes a consistent snapshot.
#[derive(Default)]
pub struct BookingStore {
    bookings: HashMap<BookingId, Booking>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn fetch_by_id(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.get(id)
    }

    /// Fetch a booking only if it is owned by `user_id`. Ownership filtering
    /// at the store level means a wrong owner sees not-found, never forbidden.
    pub fn fetch_owned(&self, id: &BookingId, user_id: UserId) -> Option<&Booking> {
        self.bookings.get(id).filter(|b| b.user_id == user_id)
    }

    pub fn fetch_by_user(&self, user_id: UserId) -> Vec<&Booking> {
        let mut out: Vec<&Booking> = self
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .collect();
        out.sort_by_key(|b| b.created_at);
        out
    }

    /// All bookings whose workplace set intersects `workplace_ids`.
    /// Used for coworking listings and conflict detection.
    pub fn fetch_by_workplaces(&self, workplace_ids: &[WorkplaceId]) -> Vec<&Booking> {
        let mut out: Vec<&Booking> = self
            .bookings
            .values()
            .filter(|b| b.uses_any(workplace_ids))
            .collect();
        out.sort_by_key(|b| b.created_at);
        out
    }

    pub fn fetch_all(&self) -> Vec<&Booking> {
        let mut out: Vec<&Booking> = self.bookings.values().collect();
        out.sort_by_key(|b| b.created_at);
        out
    }

    /// Bookings matching the notification-bot predicate:
    /// `start_time − 1 h < end_time`, compared on the booking's own fields.
    /// The polling bot depends on exactly these results.
    pub fn fetch_pending(&self) -> Vec<&Booking> {
        let mut out: Vec<&Booking> = self
            .bookings
            .values()
            .filter(|b| b.span.start - PENDING_WINDOW_MS < b.span.end)
            .collect();
        out.sort_by_key(|b| b.span.start);
        out
    }

    /// Any booking reserving one of `workplace_ids` whose range overlaps
    /// `span` (open interval), excluding `exclude` when given.
    pub fn find_conflict(
        &self,
        workplace_ids: &[WorkplaceId],
        span: &Span,
        exclude: Option<BookingId>,
    ) -> Option<&Booking> {
        self.bookings.values().find(|b| {
            exclude != Some(b.id) && b.uses_any(workplace_ids) && b.span.overlaps(span)
        })
    }

    /// Apply a WAL event to the table. Also used during startup replay.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::BookingCreated {
                id,
                user_id,
                workplace_ids,
                span,
                total_price,
                created_at,
            } => {
                self.bookings.insert(
                    *id,
                    Booking {
                        id: *id,
                        user_id: *user_id,
                        workplace_ids: workplace_ids.clone(),
                        span: *span,
                        total_price: *total_price,
                        created_at: *created_at,
                    },
                );
            }
            Event::BookingRescheduled {
                id,
                span,
                total_price,
            } => {
                if let Some(b) = self.bookings.get_mut(id) {
                    b.span = *span;
                    b.total_price = *total_price;
                }
            }
            Event::BookingDeleted { id } => {
                self.bookings.remove(id);
            }
        }
    }
}
