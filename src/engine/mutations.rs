use std::collections::HashSet;

use tracing::warn;
use ulid::Ulid;

use crate::limits::MAX_WORKPLACES_PER_BOOKING;
use crate::model::*;
use crate::observability;

use super::conflict::{now_ms, validate_span};
use super::{Engine, EngineError};

impl Engine {
    /// Validate, price and persist a new booking atomically. The conflict
    /// scan and the insert happen under one write guard, so concurrent
    /// creates for the same workplace serialize instead of racing.
    pub async fn create_booking(
        &self,
        user_id: UserId,
        mut workplace_ids: Vec<WorkplaceId>,
        start_time: Ms,
        end_time: Ms,
    ) -> Result<BookingView, EngineError> {
        // The workplace list is a set: a repeated id must not double-count
        // in the association or the price.
        let mut seen = HashSet::new();
        workplace_ids.retain(|id| seen.insert(*id));
        if workplace_ids.is_empty() {
            return Err(EngineError::Validation("workplaces must be non-empty"));
        }
        if workplace_ids.len() > MAX_WORKPLACES_PER_BOOKING {
            return Err(EngineError::Validation("too many workplaces"));
        }
        let span = validate_span(start_time, end_time)?;

        let workplaces = self.directory.resolve_workplaces(&workplace_ids).await;
        if workplaces.is_empty() {
            return Err(EngineError::NotFound("Workplaces"));
        }
        if workplaces.len() < workplace_ids.len() {
            // Partial resolution is accepted: unknown ids are dropped and the
            // booking proceeds with what resolved.
            let resolved: Vec<WorkplaceId> = workplaces.iter().map(|w| w.id).collect();
            let dropped: Vec<String> = workplace_ids
                .iter()
                .filter(|id| !resolved.contains(id))
                .map(|id| id.to_string())
                .collect();
            warn!("create_booking: dropping unresolved workplace ids: {dropped:?}");
        }
        let resolved_ids: Vec<WorkplaceId> = workplaces.iter().map(|w| w.id).collect();

        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.store.find_conflict(&resolved_ids, &span, None) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            tracing::debug!("create_booking: conflict with {}", existing.id);
            return Err(EngineError::AccessDenied("Workplace is already booked"));
        }

        let now = now_ms();
        let id = Ulid::new();
        let event = Event::BookingCreated {
            id,
            user_id,
            workplace_ids: resolved_ids,
            span,
            total_price: total_price(&workplaces, &span),
            created_at: now,
        };
        Self::persist_and_apply(&mut inner, &event)?;
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);

        let booking = inner
            .store
            .fetch_by_id(&id)
            .cloned()
            .ok_or(EngineError::NotFound("Booking"))?;
        Ok(BookingView::assemble(&booking, workplaces, now))
    }

    /// Partial update of a booking's time range, owner-gated and allowed only
    /// while the derived status is WAITING. Reprices from the stored
    /// workplace set and re-runs the overlap scan against the new range.
    pub async fn update_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
        start_time: Option<Ms>,
        end_time: Option<Ms>,
    ) -> Result<BookingView, EngineError> {
        let mut inner = self.inner.write().await;
        let booking = inner
            .store
            .fetch_owned(&booking_id, user_id)
            .cloned()
            .ok_or(EngineError::NotFound("Booking"))?;

        let now = now_ms();
        if booking.status_at(now) != BookingStatus::Waiting {
            return Err(EngineError::AccessDenied("Booking is not waiting"));
        }

        let span = validate_span(
            start_time.unwrap_or(booking.span.start),
            end_time.unwrap_or(booking.span.end),
        )?;

        if inner
            .store
            .find_conflict(&booking.workplace_ids, &span, Some(booking_id))
            .is_some()
        {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::AccessDenied("Workplace is already booked"));
        }

        let workplaces = self.directory.resolve_workplaces(&booking.workplace_ids).await;
        if workplaces.len() != booking.workplace_ids.len() {
            // The booking still references a workplace the directory no
            // longer resolves; repricing from a shrunken set would silently
            // cut the total while the association remains.
            return Err(EngineError::NotFound("Workplaces"));
        }
        let event = Event::BookingRescheduled {
            id: booking_id,
            span,
            total_price: total_price(&workplaces, &span),
        };
        Self::persist_and_apply(&mut inner, &event)?;
        metrics::counter!(observability::BOOKINGS_RESCHEDULED_TOTAL).increment(1);

        let booking = inner
            .store
            .fetch_by_id(&booking_id)
            .cloned()
            .ok_or(EngineError::NotFound("Booking"))?;
        Ok(BookingView::assemble(&booking, workplaces, now))
    }

    /// Delete a booking and its workplace associations. Owner-gated via the
    /// store query, unconditional with respect to status.
    pub async fn delete_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        if inner.store.fetch_owned(&booking_id, user_id).is_none() {
            return Err(EngineError::NotFound("Booking"));
        }
        let event = Event::BookingDeleted { id: booking_id };
        Self::persist_and_apply(&mut inner, &event)?;
        metrics::counter!(observability::BOOKINGS_DELETED_TOTAL).increment(1);
        Ok(())
    }

    /// Validate that a booking is actionable right now: it must exist, belong
    /// to the caller and be PROCESSING. Status is purely time-derived, so
    /// there is nothing to persist here.
    pub async fn activate_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> Result<(), EngineError> {
        let inner = self.inner.read().await;
        let booking = inner
            .store
            .fetch_owned(&booking_id, user_id)
            .ok_or(EngineError::NotFound("Booking"))?;
        if booking.status_at(now_ms()) != BookingStatus::Processing {
            return Err(EngineError::AccessDenied("Booking is not processing"));
        }
        Ok(())
    }
}
