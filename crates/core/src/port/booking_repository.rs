// Booking Repository Port (Interface)

use crate::domain::{Booking, BookingId, Resource, ResourceId};
use crate::error::Result;
use async_trait::async_trait;

/// Read-side repository interface
///
/// Calls here run outside any transaction. The engine only uses them while
/// holding its lock, so they never observe a half-applied mutation.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find resource (doctor) by ID
    async fn find_resource(&self, id: ResourceId) -> Result<Option<Resource>>;

    /// All resources, ordered by ID
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Find booking by ID (any status)
    async fn find_booking_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// ACTIVE bookings ordered by (priority level, request time)
    async fn list_active_bookings_ordered(&self) -> Result<Vec<Booking>>;
}
