use crate::model::*;

use super::conflict::now_ms;
use super::{Engine, EngineError};

impl Engine {
    /// Fetch one booking with its workplace set populated.
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<BookingView, EngineError> {
        let booking = {
            let inner = self.inner.read().await;
            inner
                .store
                .fetch_by_id(&booking_id)
                .cloned()
                .ok_or(EngineError::NotFound("Booking"))?
        };
        Ok(self.populate(&booking, now_ms()).await)
    }

    /// All bookings owned by `target_user`. Requesting another user's
    /// bookings requires admin privilege.
    pub async fn list_user_bookings(
        &self,
        target_user: UserId,
        requesting_other: bool,
        is_admin: bool,
    ) -> Result<Vec<BookingView>, EngineError> {
        if requesting_other && !is_admin {
            return Err(EngineError::AccessDenied("Access denied"));
        }
        let bookings: Vec<Booking> = {
            let inner = self.inner.read().await;
            inner.store.fetch_by_user(target_user).into_iter().cloned().collect()
        };
        self.populate_all(bookings).await
    }

    /// All bookings whose workplace set intersects the coworking's
    /// workplaces. Unknown coworking is a hard not-found.
    pub async fn list_coworking_bookings(
        &self,
        coworking_id: CoworkingId,
    ) -> Result<Vec<BookingView>, EngineError> {
        if !self.directory.coworking_exists(coworking_id).await {
            return Err(EngineError::NotFound("Coworking"));
        }
        let workplace_ids = self.directory.workplaces_of(coworking_id).await;
        let bookings: Vec<Booking> = {
            let inner = self.inner.read().await;
            inner
                .store
                .fetch_by_workplaces(&workplace_ids)
                .into_iter()
                .cloned()
                .collect()
        };
        self.populate_all(bookings).await
    }

    /// Every booking in the system. Admin only.
    pub async fn list_all_bookings(&self, is_admin: bool) -> Result<Vec<BookingView>, EngineError> {
        if !is_admin {
            return Err(EngineError::AccessDenied("Access denied"));
        }
        let bookings: Vec<Booking> = {
            let inner = self.inner.read().await;
            inner.store.fetch_all().into_iter().cloned().collect()
        };
        self.populate_all(bookings).await
    }

    /// Read endpoint consumed by the notification bot. The predicate compares
    /// a booking's own start/end fields (`start − 1 h < end`), not the clock;
    /// the bot's polling behavior depends on exactly these results.
    pub async fn pending_bookings(&self) -> Result<Vec<BookingView>, EngineError> {
        let bookings: Vec<Booking> = {
            let inner = self.inner.read().await;
            inner.store.fetch_pending().into_iter().cloned().collect()
        };
        self.populate_all(bookings).await
    }

    async fn populate_all(&self, bookings: Vec<Booking>) -> Result<Vec<BookingView>, EngineError> {
        let now = now_ms();
        let mut views = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            views.push(self.populate(booking, now).await);
        }
        Ok(views)
    }
}
