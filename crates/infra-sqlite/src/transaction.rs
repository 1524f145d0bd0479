// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::queries::{self, BookingRow, RequesterRow, BOOKING_COLUMNS};
use async_trait::async_trait;
use chrono::NaiveDate;
use medslot_core::domain::{
    Booking, BookingId, BookingStatus, NewBooking, Requester, Resource, ResourceId, Slot,
};
use medslot_core::error::{AppError, Result};
use medslot_core::port::{BookingTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use tracing::debug;

pub struct SqliteBookingTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteBookingTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteBookingTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl BookingTransaction for SqliteBookingTransaction<'_> {
    async fn find_resource(&mut self, id: ResourceId) -> Result<Option<Resource>> {
        queries::find_resource(&mut *self.tx, id).await
    }

    async fn find_requester_by_name(&mut self, name: &str) -> Result<Option<Requester>> {
        let row: Option<RequesterRow> =
            sqlx::query_as("SELECT id, name FROM requester WHERE name = ?")
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(Requester::from))
    }

    async fn create_requester(&mut self, name: &str) -> Result<Requester> {
        let id = sqlx::query("INSERT INTO requester (name) VALUES (?)")
            .bind(name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?
            .last_insert_rowid();

        debug!(requester_id = id, name, "Requester created");
        Ok(Requester {
            id,
            name: name.to_string(),
        })
    }

    async fn count_active_bookings(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM booking WHERE resource_id = ? AND date = ? AND status = ?",
        )
        .bind(resource_id)
        .bind(date)
        .bind(BookingStatus::Active.to_string())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_active_booking(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot: &Slot,
        exclude_id: Option<BookingId>,
    ) -> Result<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking \
             WHERE resource_id = ? AND date = ? AND slot_start = ? AND slot_end = ? \
             AND status = ? AND (? IS NULL OR id <> ?) \
             LIMIT 1"
        ))
        .bind(resource_id)
        .bind(date)
        .bind(slot.start)
        .bind(slot.end)
        .bind(BookingStatus::Active.to_string())
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_booking_by_id(&mut self, id: BookingId) -> Result<Option<Booking>> {
        queries::find_booking_by_id(&mut *self.tx, id).await
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking> {
        let id = sqlx::query(
            r#"
            INSERT INTO booking (
                resource_id, requester_id, requester_name, date,
                slot_start, slot_end, priority, request_time, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.resource_id)
        .bind(booking.requester_id)
        .bind(&booking.requester_name)
        .bind(booking.date)
        .bind(booking.slot.start)
        .bind(booking.slot.end)
        .bind(i64::from(booking.priority.level()))
        .bind(booking.requested_at)
        .bind(BookingStatus::Active.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?
        .last_insert_rowid();

        debug!(booking_id = id, "Booking row inserted");
        Ok(booking.clone().into_booking(id))
    }

    async fn update_booking(&mut self, booking: &Booking) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE booking
            SET date = ?, slot_start = ?, slot_end = ?, priority = ?,
                request_time = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(booking.date)
        .bind(booking.slot.start)
        .bind(booking.slot.end)
        .bind(i64::from(booking.priority.level()))
        .bind(booking.requested_at)
        .bind(booking.status.to_string())
        .bind(booking.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database(format!(
                "Booking {} vanished during update",
                booking.id
            )));
        }

        Ok(())
    }
}
