use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type used internally.
pub type Ms = i64;

/// Numeric user id (≥ 1), issued by the identity provider.
pub type UserId = i64;

pub type BookingId = Ulid;
pub type WorkplaceId = Ulid;
pub type CoworkingId = Ulid;
pub type TariffId = Ulid;

pub const MS_PER_HOUR: Ms = 3_600_000;

/// A booking flips WAITING → PROCESSING this long before its start.
pub const PROCESSING_LEAD_MS: Ms = 5 * 60_000;

/// Window used by the pending-bookings predicate.
pub const PENDING_WINDOW_MS: Ms = MS_PER_HOUR;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_ms() as f64 / MS_PER_HOUR as f64
    }

    /// Open-interval overlap: touching endpoints do not count.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Time-derived booking lifecycle stage. Never stored — recomputed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Processing,
    Finished,
}

/// Pure function of `(now, span)`: WAITING until five minutes before start,
/// FINISHED after end, PROCESSING in between.
pub fn status_at(span: &Span, now: Ms) -> BookingStatus {
    if now < span.start - PROCESSING_LEAD_MS {
        BookingStatus::Waiting
    } else if now > span.end {
        BookingStatus::Finished
    } else {
        BookingStatus::Processing
    }
}

/// Hourly price plan assigned to one or more workplaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: TariffId,
    pub name: String,
    pub price_per_hour: u32,
}

/// A reservable desk within a coworking location. Read-only snapshot from the
/// directory — the booking engine never mutates workplaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workplace {
    pub id: WorkplaceId,
    pub coworking_id: CoworkingId,
    pub name: String,
    pub tariff: Tariff,
}

/// Persisted booking record. Status is not a field — see [`status_at`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    /// Non-empty; many-to-many association with workplaces.
    pub workplace_ids: Vec<WorkplaceId>,
    pub span: Span,
    pub total_price: f64,
    pub created_at: Ms,
}

impl Booking {
    pub fn status_at(&self, now: Ms) -> BookingStatus {
        status_at(&self.span, now)
    }

    /// True if this booking reserves any of the given workplaces.
    pub fn uses_any(&self, workplace_ids: &[WorkplaceId]) -> bool {
        self.workplace_ids.iter().any(|w| workplace_ids.contains(w))
    }
}

/// Sum of `price_per_hour × duration_hours` over the given workplaces.
/// Fractional hours allowed, no rounding.
pub fn total_price(workplaces: &[Workplace], span: &Span) -> f64 {
    let hours = span.duration_hours();
    workplaces
        .iter()
        .map(|w| w.tariff.price_per_hour as f64 * hours)
        .sum()
}

/// Booking with its workplace set populated (tariffs included), as returned
/// by every engine read path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingView {
    pub id: BookingId,
    pub user_id: UserId,
    pub workplaces: Vec<Workplace>,
    pub span: Span,
    pub status: BookingStatus,
    pub total_price: f64,
    pub created_at: Ms,
}

impl BookingView {
    pub fn assemble(booking: &Booking, workplaces: Vec<Workplace>, now: Ms) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            workplaces,
            span: booking.span,
            status: booking.status_at(now),
            total_price: booking.total_price,
            created_at: booking.created_at,
        }
    }
}

/// The event types — flat, no nesting. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BookingCreated {
        id: BookingId,
        user_id: UserId,
        workplace_ids: Vec<WorkplaceId>,
        span: Span,
        total_price: f64,
        created_at: Ms,
    },
    BookingRescheduled {
        id: BookingId,
        span: Span,
        total_price: f64,
    },
    BookingDeleted {
        id: BookingId,
    },
}
