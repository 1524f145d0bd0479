// Cancel Use Case

use crate::domain::BookingId;
use crate::error::Result;
use crate::port::TransactionalBookingRepository;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Cancel result
///
/// A missing or already-cancelled booking is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelOutcome {
    Cancelled,
    NotActive,
}

/// Execute cancel use case. Idempotent: repeated calls report `NotActive`
/// and never touch the store.
pub async fn execute(repo: &dyn TransactionalBookingRepository, id: BookingId) -> Result<CancelOutcome> {
    let mut tx = repo.begin_transaction().await?;

    match tx.find_booking_by_id(id).await? {
        Some(mut booking) if booking.is_active() => {
            booking.cancel()?;
            tx.update_booking(&booking).await?;
            tx.commit().await?;

            info!(booking_id = id, "Appointment cancelled");
            Ok(CancelOutcome::Cancelled)
        }
        _ => {
            tx.rollback().await?;

            warn!(booking_id = id, "No active appointment to cancel");
            Ok(CancelOutcome::NotActive)
        }
    }
}
