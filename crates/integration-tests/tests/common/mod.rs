//! Shared setup: a migrated, seeded in-memory SQLite store behind the engine

#![allow(dead_code)]

use chrono::NaiveDate;
use medslot_core::application::{BookingRequest, EngineConfig, SchedulingEngine};
use medslot_core::domain::{Priority, ResourceId};
use medslot_core::port::time_provider::SteppingTimeProvider;
use medslot_infra_sqlite::{
    create_pool, run_migrations, seed_default_resources, SqliteBookingRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Seeded doctors
pub const SMITH: ResourceId = 1; // 09:00-17:00
pub const JONES: ResourceId = 2; // 10:00-18:00
pub const TAYLOR: ResourceId = 3; // 08:00-16:00

pub struct Harness {
    pub engine: Arc<SchedulingEngine>,
    pub pool: SqlitePool,
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    today().succ_opt().unwrap()
}

pub async fn harness() -> Harness {
    harness_with(EngineConfig::default()).await
}

pub async fn harness_with(config: EngineConfig) -> Harness {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    seed_default_resources(&pool).await.unwrap();
    Harness {
        engine: engine_over(&pool, config),
        pool,
    }
}

pub fn engine_over(pool: &SqlitePool, config: EngineConfig) -> Arc<SchedulingEngine> {
    let repo = Arc::new(SqliteBookingRepository::new(pool.clone()));
    let clock = Arc::new(SteppingTimeProvider::new(today(), 1_000));
    Arc::new(SchedulingEngine::new(repo, clock, config))
}

pub fn request(
    resource_id: ResourceId,
    name: &str,
    date: NaiveDate,
    slot: &str,
    priority: Priority,
) -> BookingRequest {
    BookingRequest {
        resource_id,
        requester_name: name.to_string(),
        date,
        slot: slot.to_string(),
        priority,
    }
}

/// Row count straight from SQL, bypassing the engine
pub async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}
