// Booking Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::{Priority, RequesterId, ResourceId, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking ID (monotonic, assigned by the store)
pub type BookingId = i64;

/// Booking State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Active => write!(f, "ACTIVE"),
            BookingStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A booking that has not been persisted yet (the store assigns the id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub resource_id: ResourceId,
    pub requester_id: RequesterId,
    pub requester_name: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub priority: Priority,
    pub requested_at: i64, // epoch ms
}

/// Booking Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub resource_id: ResourceId,
    pub requester_id: RequesterId,

    // Name as it was at booking time; kept alongside the requester reference
    pub requester_name: String,

    pub date: NaiveDate,
    pub slot: Slot,
    pub priority: Priority,
    pub requested_at: i64, // epoch ms, tie-breaker within a priority level
    pub status: BookingStatus,
}

impl NewBooking {
    /// Attach the store-assigned id. New bookings are always ACTIVE.
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            resource_id: self.resource_id,
            requester_id: self.requester_id,
            requester_name: self.requester_name,
            date: self.date,
            slot: self.slot,
            priority: self.priority,
            requested_at: self.requested_at,
            status: BookingStatus::Active,
        }
    }
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// Transition ACTIVE -> CANCELLED. CANCELLED is terminal.
    pub fn cancel(&mut self) -> Result<()> {
        if self.status != BookingStatus::Active {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: BookingStatus::Cancelled.to_string(),
            });
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// Move an ACTIVE booking to a new date/slot, restamping its request time.
    pub fn move_to(&mut self, date: NaiveDate, slot: Slot, now_millis: i64) -> Result<()> {
        if self.status != BookingStatus::Active {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: BookingStatus::Active.to_string(),
            });
        }
        self.date = date;
        self.slot = slot;
        self.requested_at = now_millis;
        self.status = BookingStatus::Active;
        Ok(())
    }

    /// Queue order: priority level ascending, then request time ascending.
    /// The id breaks exact timestamp ties so the order is total.
    pub fn queue_key(&self) -> (u8, i64, BookingId) {
        (self.priority.level(), self.requested_at, self.id)
    }
}
