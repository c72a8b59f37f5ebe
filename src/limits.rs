use crate::model::Ms;

/// Max workplaces a single booking may reference.
pub const MAX_WORKPLACES_PER_BOOKING: usize = 64;

/// Max booking duration: 30 days.
pub const MAX_SPAN_DURATION_MS: Ms = 30 * 24 * 3_600_000;

/// 2000-01-01T00:00:00Z — anything earlier is a caller bug.
pub const MIN_VALID_TIMESTAMP_MS: Ms = 946_684_800_000;

/// 2100-01-01T00:00:00Z.
pub const MAX_VALID_TIMESTAMP_MS: Ms = 4_102_444_800_000;
