mod conflict;
mod error;
mod mutations;
mod queries;

pub use error::EngineError;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::directory::Directory;
use crate::model::{Booking, BookingView, Event};
use crate::store::BookingStore;
use crate::wal::Wal;

/// Booking table plus its WAL, guarded together so that every mutation holds
/// one write guard across check-then-act: conflict scan, WAL append, apply.
/// Concurrent creates are serialized by construction — no interleaving can
/// observe or produce two overlapping bookings on the same workplace.
pub(super) struct EngineInner {
    pub(super) store: BookingStore,
    wal: Wal,
}

pub struct Engine {
    pub(super) inner: RwLock<EngineInner>,
    pub(super) directory: Arc<dyn Directory>,
}

impl Engine {
    /// Open the WAL at `wal_path`, replay it into the booking table and
    /// return a ready engine.
    pub fn new(wal_path: PathBuf, directory: Arc<dyn Directory>) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;

        let mut store = BookingStore::new();
        for event in &events {
            store.apply(event);
        }
        tracing::info!("replayed {} events, {} bookings live", events.len(), store.len());

        Ok(Self {
            inner: RwLock::new(EngineInner { store, wal }),
            directory,
        })
    }

    /// WAL-append + apply in one call. The caller holds the write guard.
    pub(super) fn persist_and_apply(
        inner: &mut EngineInner,
        event: &Event,
    ) -> Result<(), EngineError> {
        inner
            .wal
            .append(event)
            .map_err(|e| EngineError::Wal(e.to_string()))?;
        inner.store.apply(event);
        Ok(())
    }

    /// Populate a booking's workplace set (tariffs included) and derive its
    /// status at `now`.
    pub(super) async fn populate(&self, booking: &Booking, now: i64) -> BookingView {
        let workplaces = self.directory.resolve_workplaces(&booking.workplace_ids).await;
        BookingView::assemble(booking, workplaces, now)
    }
}
