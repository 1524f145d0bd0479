//! Scheduling Engine - booking, cancellation, rescheduling and the priority queue view
//!
//! Every operation runs under one engine-wide lock held for its full duration,
//! store calls included. Conflict resolution is a read-decide-write sequence,
//! and two callers must never both observe "slot free" and both insert. This
//! is the only serialization point; throughput is deliberately traded for it.
//!
//! The lock is a `tokio::sync::Mutex`, which queues waiters FIFO, so
//! near-simultaneous requests are processed strictly in arrival order.

pub mod book;
pub mod cancel;
pub mod reschedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use book::BookingRequest;
pub use cancel::CancelOutcome;

use crate::application::constants::{DEFAULT_DAILY_LIMIT, DEFAULT_LOCK_TIMEOUT};
use crate::domain::{Booking, BookingId, Resource};
use crate::error::{AppError, Result};
use crate::port::{BookingTransaction, TimeProvider, TransactionalBookingRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Max ACTIVE bookings per doctor per day (checked only when the slot is free)
    pub daily_limit: u32,

    /// Max wait for the engine lock; `None` waits indefinitely
    pub lock_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
            lock_timeout: Some(DEFAULT_LOCK_TIMEOUT),
        }
    }
}

/// Scheduling Engine
pub struct SchedulingEngine {
    repo: Arc<dyn TransactionalBookingRepository>,
    time_provider: Arc<dyn TimeProvider>,
    config: EngineConfig,
    lock: Mutex<()>,
}

impl SchedulingEngine {
    pub fn new(
        repo: Arc<dyn TransactionalBookingRepository>,
        time_provider: Arc<dyn TimeProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repo,
            time_provider,
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Book a slot, preempting a lower-priority incumbent if there is one
    pub async fn book(&self, req: BookingRequest) -> Result<BookingId> {
        let _guard = self.acquire("book").await?;
        book::execute(
            self.repo.as_ref(),
            self.time_provider.as_ref(),
            &self.config,
            req,
        )
        .await
    }

    /// Cancel an ACTIVE booking
    pub async fn cancel(&self, id: BookingId) -> Result<CancelOutcome> {
        let _guard = self.acquire("cancel").await?;
        cancel::execute(self.repo.as_ref(), id).await
    }

    /// Move a booking to a new date/slot
    pub async fn reschedule(&self, id: BookingId, date: NaiveDate, slot: &str) -> Result<Booking> {
        let _guard = self.acquire("reschedule").await?;
        reschedule::execute(
            self.repo.as_ref(),
            self.time_provider.as_ref(),
            id,
            date,
            slot,
        )
        .await
    }

    /// All ACTIVE bookings in queue order (priority level, then request time)
    pub async fn list_active(&self) -> Result<Vec<Booking>> {
        let _guard = self.acquire("list_active").await?;
        self.repo.list_active_bookings_ordered().await
    }

    /// Find a booking in any state
    pub async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>> {
        let _guard = self.acquire("find_booking").await?;
        self.repo.find_booking_by_id(id).await
    }

    /// Resources are immutable here, so no lock is taken
    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.repo.list_resources().await
    }

    async fn acquire(&self, operation: &'static str) -> Result<MutexGuard<'_, ()>> {
        let guard = match self.config.lock_timeout {
            Some(limit) => tokio::time::timeout(limit, self.lock.lock())
                .await
                .map_err(|_| {
                    warn!(operation, timeout = ?limit, "Engine lock not acquired in time");
                    AppError::Busy(limit)
                })?,
            None => self.lock.lock().await,
        };
        debug!(operation, "Engine lock acquired");
        Ok(guard)
    }
}

/// Roll back `tx` and fail with `err`.
///
/// A failing rollback is logged and otherwise ignored: the caller's error is
/// the one worth reporting, and the dropped transaction is discarded anyway.
pub(crate) async fn abort<T>(tx: Box<dyn BookingTransaction>, err: AppError) -> Result<T> {
    if let Err(rollback_err) = tx.rollback().await {
        warn!(error = %rollback_err, "Rollback failed");
    }
    Err(err)
}
