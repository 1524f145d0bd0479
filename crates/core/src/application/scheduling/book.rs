// Book Use Case

use crate::application::scheduling::{abort, EngineConfig};
use crate::domain::{parse_slot, within_working_hours, BookingId, NewBooking, Priority};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalBookingRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub resource_id: i64,
    pub requester_name: String,
    pub date: NaiveDate,
    pub slot: String,
    pub priority: Priority,
}

/// Execute book use case (with transaction for atomicity)
///
/// Preconditions are checked in order and fail fast: unknown doctor, empty
/// patient name, slot grammar, past date, working hours. Then:
///
/// 1. Find or create the requester by name.
/// 2. Count ACTIVE bookings for (doctor, date).
/// 3. Look up the ACTIVE booking at exactly (doctor, date, slot).
/// 4. An incumbent is cancelled if the request strictly outranks it, otherwise
///    the request fails with `SlotAlreadyBooked`. Only when the slot is free
///    does the daily limit apply.
/// 5. Insert the new ACTIVE booking and commit.
///
/// Every rejection rolls back, so nothing (not even a new requester) is persisted.
pub async fn execute(
    repo: &dyn TransactionalBookingRepository,
    time_provider: &dyn TimeProvider,
    config: &EngineConfig,
    req: BookingRequest,
) -> Result<BookingId> {
    let mut tx = repo.begin_transaction().await?;

    let Some(resource) = tx.find_resource(req.resource_id).await? else {
        return abort(tx, AppError::UnknownResource(req.resource_id)).await;
    };

    let requester_name = req.requester_name.trim();
    if requester_name.is_empty() {
        return abort(tx, AppError::InvalidRequester).await;
    }

    let slot = match parse_slot(&req.slot) {
        Ok(slot) => slot,
        Err(e) => return abort(tx, e.into()).await,
    };

    let today = time_provider.today();
    if req.date < today {
        return abort(tx, AppError::PastDate { date: req.date, today }).await;
    }

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

    let requester = match tx.find_requester_by_name(requester_name).await? {
        Some(requester) => requester,
        None => tx.create_requester(requester_name).await?,
    };

    let daily_count = tx.count_active_bookings(resource.id, req.date).await?;
    let conflict = tx
        .find_active_booking(resource.id, req.date, &slot, None)
        .await?;

    match conflict {
        Some(mut incumbent) if req.priority.outranks(incumbent.priority) => {
            incumbent.cancel()?;
            tx.update_booking(&incumbent).await?;
            info!(
                preempted_id = incumbent.id,
                preempted_priority = %incumbent.priority,
                priority = %req.priority,
                slot = %slot,
                "Higher priority booking replaces existing one"
            );
        }
        Some(incumbent) => {
            warn!(
                resource_id = resource.id,
                date = %req.date,
                slot = %slot,
                incumbent_id = incumbent.id,
                "Slot already booked"
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
        None if daily_count >= i64::from(config.daily_limit) => {
            warn!(
                resource_id = resource.id,
                date = %req.date,
                daily_count,
                limit = config.daily_limit,
                "Daily limit reached"
            );
            return abort(
                tx,
                AppError::DailyLimitExceeded {
                    limit: config.daily_limit,
                },
            )
            .await;
        }
        None => {}
    }

    let booking = tx
        .insert_booking(&NewBooking {
            resource_id: resource.id,
            requester_id: requester.id,
            requester_name: requester.name.clone(),
            date: req.date,
            slot,
            priority: req.priority,
            requested_at: time_provider.now_millis(),
        })
        .await?;

    tx.commit().await?;

    info!(
        booking_id = booking.id,
        resource_id = resource.id,
        date = %booking.date,
        slot = %booking.slot,
        priority = %booking.priority,
        "Appointment booked"
    );

    Ok(booking.id)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{engine, engine_with, tomorrow, today, FailPoint};
    use super::*;
    use crate::domain::BookingStatus;
    use crate::error::ErrorKind;
    use tokio_test::{assert_err, assert_ok};

    fn request(name: &str, slot: &str, priority: Priority) -> BookingRequest {
        BookingRequest {
            resource_id: 1,
            requester_name: name.to_string(),
            date: tomorrow(),
            slot: slot.to_string(),
            priority,
        }
    }

    #[tokio::test]
    async fn test_book_creates_active_booking() {
        let (engine, store) = engine();

        let id = assert_ok!(
            engine
                .book(request("Alice", "10:00-10:30", Priority::Regular))
                .await
        );

        let booking = store.booking(id);
        assert_eq!(booking.status, BookingStatus::Active);
        assert_eq!(booking.requester_name, "Alice");
        assert_eq!(booking.slot.to_string(), "10:00-10:30");
        assert_eq!(booking.date, tomorrow());
    }

    #[tokio::test]
    async fn test_book_assigns_fresh_ids() {
        let (engine, _store) = engine();

        let first = engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let second = engine
            .book(request("Bob", "10:30-11:00", Priority::Regular))
            .await
            .unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_book_today_is_allowed() {
        let (engine, _store) = engine();
        let mut req = request("Alice", "10:00-10:30", Priority::Regular);
        req.date = today();

        assert_ok!(engine.book(req).await);
    }

    #[tokio::test]
    async fn test_requester_is_reused_by_name() {
        let (engine, store) = engine();

        let a = engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let b = engine
            .book(request("  Alice ", "11:00-11:30", Priority::Regular))
            .await
            .unwrap();

        assert_eq!(store.requester_count(), 1);
        assert_eq!(store.booking(a).requester_id, store.booking(b).requester_id);
    }

    #[tokio::test]
    async fn test_validation_order_and_kinds() {
        let (engine, store) = engine();

        // Unknown doctor wins over every other defect
        let mut req = request("", "bad", Priority::Regular);
        req.resource_id = 99;
        req.date = today().pred_opt().unwrap();
        let err = engine.book(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownResource);

        let err = engine
            .book(request("   ", "bad", Priority::Regular))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequester);

        let mut req = request("Alice", "10:00", Priority::Regular);
        req.date = today().pred_opt().unwrap();
        let err = engine.book(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSlotFormat);

        let mut req = request("Alice", "7:00-7:30", Priority::Regular);
        req.date = today().pred_opt().unwrap();
        let err = engine.book(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PastDate);

        let err = engine
            .book(request("Alice", "16:45-17:15", Priority::Regular))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideWorkingHours);

        assert!(store.bookings().is_empty());
        assert_eq!(store.requester_count(), 0);
    }

    #[tokio::test]
    async fn test_vip_preempts_regular() {
        let (engine, store) = engine();

        let regular = engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let vip = engine
            .book(request("Bob", "10:00-10:30", Priority::Vip))
            .await
            .unwrap();

        assert_eq!(store.booking(regular).status, BookingStatus::Cancelled);
        assert_eq!(store.booking(vip).status, BookingStatus::Active);

        let active = engine.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, vip);
        assert_eq!(active[0].priority, Priority::Vip);
    }

    #[tokio::test]
    async fn test_vip_cannot_preempt_emergency() {
        let (engine, store) = engine();

        let emergency = engine
            .book(request("Alice", "10:00-10:30", Priority::Emergency))
            .await
            .unwrap();
        let before = store.booking(emergency);

        let err = assert_err!(
            engine
                .book(request("Bob", "10:00-10:30", Priority::Vip))
                .await
        );

        assert!(matches!(
            err,
            AppError::SlotAlreadyBooked { booking_id, priority: Priority::Emergency } if booking_id == emergency
        ));
        assert_eq!(store.booking(emergency), before);
        assert_eq!(store.bookings().len(), 1);
        // Bob's requester record was rolled back with the rejected booking
        assert_eq!(store.requester_count(), 1);
    }

    #[tokio::test]
    async fn test_equal_priority_is_rejected() {
        let (engine, store) = engine();

        engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let err = engine
            .book(request("Bob", "10:00-10:30", Priority::Regular))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SlotAlreadyBooked);
        assert_eq!(store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_same_slot_other_doctor_is_independent() {
        let (engine, _store) = engine();

        engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let mut req = request("Bob", "10:00-10:30", Priority::Regular);
        req.resource_id = 2;

        assert_ok!(engine.book(req).await);
    }

    #[tokio::test]
    async fn test_sixth_booking_exceeds_daily_limit() {
        let (engine, store) = engine();

        for hour in 9..14 {
            engine
                .book(request(
                    &format!("Patient {hour}"),
                    &format!("{hour}:00-{hour}:30"),
                    Priority::Regular,
                ))
                .await
                .unwrap();
        }

        let err = engine
            .book(request("Patient 14", "14:00-14:30", Priority::Regular))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DailyLimitExceeded { limit: 5 }));
        assert_eq!(engine.list_active().await.unwrap().len(), 5);
        assert_eq!(store.bookings().len(), 5);
    }

    #[tokio::test]
    async fn test_preemption_bypasses_daily_limit() {
        let (engine, _store) = engine();

        for hour in 9..14 {
            engine
                .book(request(
                    &format!("Patient {hour}"),
                    &format!("{hour}:00-{hour}:30"),
                    Priority::Regular,
                ))
                .await
                .unwrap();
        }

        // Full day, but the emergency replaces an incumbent rather than adding one
        assert_ok!(
            engine
                .book(request("Urgent", "9:00-9:30", Priority::Emergency))
                .await
        );
        assert_eq!(engine.list_active().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_daily_limit_is_configurable() {
        let (engine, _store) = engine_with(EngineConfig {
            daily_limit: 1,
            ..EngineConfig::default()
        });

        engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();
        let err = engine
            .book(request("Bob", "11:00-11:30", Priority::Regular))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DailyLimitExceeded);
    }

    #[tokio::test]
    async fn test_storage_failure_during_preemption_rolls_back() {
        let (engine, store) = engine();

        let regular = engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap();

        // The incumbent update succeeds inside the transaction, the insert fails
        store.fail_on(Some(FailPoint::Insert));
        let err = engine
            .book(request("Bob", "10:00-10:30", Priority::Vip))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert_eq!(store.booking(regular).status, BookingStatus::Active);
        assert_eq!(store.bookings().len(), 1);
        assert_eq!(store.requester_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_is_surfaced() {
        let (engine, store) = engine();
        store.fail_on(Some(FailPoint::Commit));

        let err = engine
            .book(request("Alice", "10:00-10:30", Priority::Regular))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert!(store.bookings().is_empty());
    }
}
