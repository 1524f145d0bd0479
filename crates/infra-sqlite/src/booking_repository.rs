// SQLite BookingRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use crate::SqliteBookingTransaction;
use async_trait::async_trait;
use medslot_core::domain::{Booking, BookingId, Resource, ResourceId};
use medslot_core::error::Result;
use medslot_core::port::{BookingRepository, BookingTransaction, TransactionalBookingRepository};
use sqlx::SqlitePool;

pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn find_resource(&self, id: ResourceId) -> Result<Option<Resource>> {
        queries::find_resource(&self.pool, id).await
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        queries::list_resources(&self.pool).await
    }

    async fn find_booking_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        queries::find_booking_by_id(&self.pool, id).await
    }

    async fn list_active_bookings_ordered(&self) -> Result<Vec<Booking>> {
        queries::list_active_bookings_ordered(&self.pool).await
    }
}

#[async_trait]
impl TransactionalBookingRepository for SqliteBookingRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteBookingTransaction::new(tx)))
    }
}
