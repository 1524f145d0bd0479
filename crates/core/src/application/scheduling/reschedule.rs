// Reschedule Use Case

use crate::application::scheduling::abort;
use crate::domain::{parse_slot, within_working_hours, Booking, BookingId};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalBookingRepository};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Execute reschedule use case (with transaction for atomicity)
///
/// The booking keeps its id and priority and gets a fresh request time. The
/// target slot is resolved like a booking: a strictly lower-priority occupant
/// is cancelled, anything else fails with `SlotAlreadyBooked` and leaves the
/// original booking untouched. The daily limit is not applied here.
///
/// Only ACTIVE bookings can be moved; a cancelled one reports `NotFound`.
pub async fn execute(
    repo: &dyn TransactionalBookingRepository,
    time_provider: &dyn TimeProvider,
    id: BookingId,
    date: NaiveDate,
    slot_text: &str,
) -> Result<Booking> {
    let slot = parse_slot(slot_text)?;

    let today = time_provider.today();
    if date < today {
        return Err(AppError::PastDate { date, today });
    }

    let mut tx = repo.begin_transaction().await?;

    let mut booking = match tx.find_booking_by_id(id).await? {
        Some(booking) if booking.is_active() => booking,
        _ => return abort(tx, AppError::NotFound(id)).await,
    };

    let Some(resource) = tx.find_resource(booking.resource_id).await? else {
        return abort(tx, AppError::UnknownResource(booking.resource_id)).await;
    };

    if !within_working_hours(&slot, &resource) {
        return abort(
            tx,
            AppError::OutsideWorkingHours {
                slot: slot.to_string(),
                working_hours: resource.working_hours(),
            },
        )
        .await;
    }

    let conflict = tx
        .find_active_booking(resource.id, date, &slot, Some(id))
        .await?;

    if let Some(mut incumbent) = conflict {
        if !booking.priority.outranks(incumbent.priority) {
            warn!(
                booking_id = id,
                incumbent_id = incumbent.id,
                date = %date,
                slot = %slot,
                "Reschedule target taken by higher or equal priority"
            );
            return abort(
                tx,
                AppError::SlotAlreadyBooked {
                    booking_id: incumbent.id,
                    priority: incumbent.priority,
                },
            )
            .await;
        }

        incumbent.cancel()?;
        tx.update_booking(&incumbent).await?;
        info!(
            preempted_id = incumbent.id,
            booking_id = id,
            "Higher priority booking replaces existing one"
        );
    }

    booking.move_to(date, slot, time_provider.now_millis())?;
    tx.update_booking(&booking).await?;
    tx.commit().await?;

    info!(
        booking_id = id,
        date = %booking.date,
        slot = %booking.slot,
        "Appointment rescheduled"
    );

    Ok(booking)
}
