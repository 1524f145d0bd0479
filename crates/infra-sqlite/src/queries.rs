// Row mapping and queries shared by the pool-backed repository and transactions

use crate::error::{corrupt_row, map_sqlx_error};
use chrono::{NaiveDate, NaiveTime};
use medslot_core::domain::{
    Booking, BookingId, BookingStatus, Priority, Requester, Resource, ResourceId, Slot,
};
use medslot_core::error::Result;
use sqlx::{Executor, Sqlite};

pub(crate) const RESOURCE_COLUMNS: &str = "id, name, category, start_time, end_time";

pub(crate) const BOOKING_COLUMNS: &str = "id, resource_id, requester_id, requester_name, date, \
     slot_start, slot_end, priority, request_time, status";

#[derive(sqlx::FromRow)]
pub(crate) struct ResourceRow {
    id: i64,
    name: String,
    category: String,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Resource {
            id: row.id,
            name: row.name,
            category: row.category,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RequesterRow {
    id: i64,
    name: String,
}

impl From<RequesterRow> for Requester {
    fn from(row: RequesterRow) -> Self {
        Requester {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BookingRow {
    id: i64,
    resource_id: i64,
    requester_id: i64,
    requester_name: String,
    date: NaiveDate,
    slot_start: NaiveTime,
    slot_end: NaiveTime,
    priority: i64,
    request_time: i64,
    status: String,
}

impl BookingRow {
    pub(crate) fn into_booking(self) -> Result<Booking> {
        let slot = Slot::new(self.slot_start, self.slot_end)
            .map_err(|e| corrupt_row("booking", self.id, e))?;

        let priority = u8::try_from(self.priority)
            .ok()
            .and_then(Priority::from_level)
            .ok_or_else(|| corrupt_row("booking", self.id, format!("priority {}", self.priority)))?;

        let status = status_from_str(&self.status)
            .ok_or_else(|| corrupt_row("booking", self.id, format!("status {}", self.status)))?;

        Ok(Booking {
            id: self.id,
            resource_id: self.resource_id,
            requester_id: self.requester_id,
            requester_name: self.requester_name,
            date: self.date,
            slot,
            priority,
            requested_at: self.request_time,
            status,
        })
    }
}

fn status_from_str(s: &str) -> Option<BookingStatus> {
    match s {
        "ACTIVE" => Some(BookingStatus::Active),
        "CANCELLED" => Some(BookingStatus::Cancelled),
        _ => None,
    }
}

pub(crate) async fn find_resource<'e, E>(executor: E, id: ResourceId) -> Result<Option<Resource>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<ResourceRow> =
        sqlx::query_as(&format!("SELECT {RESOURCE_COLUMNS} FROM resource WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(map_sqlx_error)?;

    Ok(row.map(Resource::from))
}

pub(crate) async fn list_resources<'e, E>(executor: E) -> Result<Vec<Resource>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<ResourceRow> =
        sqlx::query_as(&format!("SELECT {RESOURCE_COLUMNS} FROM resource ORDER BY id"))
            .fetch_all(executor)
            .await
            .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(Resource::from).collect())
}

pub(crate) async fn find_booking_by_id<'e, E>(executor: E, id: BookingId) -> Result<Option<Booking>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<BookingRow> =
        sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM booking WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(map_sqlx_error)?;

    row.map(BookingRow::into_booking).transpose()
}

/// ACTIVE bookings in queue order. The id makes the order total when two
/// requests carry the same timestamp.
pub(crate) async fn list_active_bookings_ordered<'e, E>(executor: E) -> Result<Vec<Booking>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<BookingRow> = sqlx::query_as(&format!(
        "SELECT {BOOKING_COLUMNS} FROM booking WHERE status = ? \
         ORDER BY priority ASC, request_time ASC, id ASC"
    ))
    .bind(BookingStatus::Active.to_string())
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    rows.into_iter().map(BookingRow::into_booking).collect()
}
