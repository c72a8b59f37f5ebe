use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{BookingStatus, BookingView, Ms, Tariff, UserId, Workplace};

/// Render unix milliseconds as an ISO-8601 (RFC 3339) UTC timestamp.
pub fn ms_to_iso(ms: Ms) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}

/// Parse an ISO-8601 timestamp into unix milliseconds.
pub fn iso_to_ms(s: &str) -> Option<Ms> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.timestamp_millis())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffDto {
    pub id: String,
    pub name: String,
    pub price_per_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkplaceDto {
    pub id: String,
    pub coworking_id: String,
    pub name: String,
    pub tariff: TariffDto,
}

/// Booking wire representation: opaque string ids, ISO-8601 times, derived
/// status string, decimal price. This is the shape the request layer
/// serializes; routing itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDto {
    pub id: String,
    pub user_id: UserId,
    pub workplaces: Vec<WorkplaceDto>,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub total_price: f64,
    pub created_at: String,
}

impl From<&Tariff> for TariffDto {
    fn from(t: &Tariff) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            price_per_hour: t.price_per_hour,
        }
    }
}

impl From<&Workplace> for WorkplaceDto {
    fn from(w: &Workplace) -> Self {
        Self {
            id: w.id.to_string(),
            coworking_id: w.coworking_id.to_string(),
            name: w.name.clone(),
            tariff: (&w.tariff).into(),
        }
    }
}

impl From<&BookingView> for BookingDto {
    fn from(view: &BookingView) -> Self {
        Self {
            id: view.id.to_string(),
            user_id: view.user_id,
            workplaces: view.workplaces.iter().map(Into::into).collect(),
            start_time: ms_to_iso(view.span.start),
            end_time: ms_to_iso(view.span.end),
            status: view.status,
            total_price: view.total_price,
            created_at: ms_to_iso(view.created_at),
        }
    }
}

/// Inbound create payload: workplace ids plus an ISO-8601 time range.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub workplaces: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Inbound update payload: both fields optional (partial update).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
