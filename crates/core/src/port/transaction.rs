// Transaction port for atomic operations

use crate::domain::{Booking, BookingId, NewBooking, Requester, Resource, ResourceId, Slot};
use crate::error::Result;
use crate::port::BookingRepository;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Transaction trait for atomic multi-step operations
///
/// Dropping a transaction without calling `commit` discards its writes.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional BookingRepository operations
#[async_trait]
pub trait TransactionalBookingRepository: BookingRepository {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>>;
}

/// Store operations within a transaction
#[async_trait]
pub trait BookingTransaction: Transaction {
    /// Find resource (within transaction)
    async fn find_resource(&mut self, id: ResourceId) -> Result<Option<Resource>>;

    /// Find requester by exact name
    async fn find_requester_by_name(&mut self, name: &str) -> Result<Option<Requester>>;

    /// Create requester
    async fn create_requester(&mut self, name: &str) -> Result<Requester>;

    /// Count ACTIVE bookings for a resource on a date
    async fn count_active_bookings(&mut self, resource_id: ResourceId, date: NaiveDate)
        -> Result<i64>;

    /// Find the ACTIVE booking at exactly (resource, date, slot), optionally
    /// ignoring one booking id
    async fn find_active_booking(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot: &Slot,
        exclude_id: Option<BookingId>,
    ) -> Result<Option<Booking>>;

    /// Find booking by ID (within transaction)
    async fn find_booking_by_id(&mut self, id: BookingId) -> Result<Option<Booking>>;

    /// Persist a new booking and return it with its assigned ID
    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking>;

    /// Persist changes to an existing booking
    async fn update_booking(&mut self, booking: &Booking) -> Result<()>;
}
