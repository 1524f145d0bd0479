// Resource seeding

use crate::error::map_sqlx_error;
use chrono::NaiveTime;
use medslot_core::domain::Resource;
use medslot_core::error::{AppError, Result};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

/// Doctors created on first start: (name, specialty, opens, closes)
const DEFAULT_RESOURCES: [(&str, &str, (u32, u32), (u32, u32)); 3] = [
    ("Dr. Smith", "Cardiologist", (9, 0), (17, 0)),
    ("Dr. Jones", "Dermatologist", (10, 0), (18, 0)),
    ("Dr. Taylor", "General Physician", (8, 0), (16, 0)),
];

/// Insert one resource and return it with its assigned ID
pub async fn insert_resource<'e, E>(
    executor: E,
    name: &str,
    category: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Resource>
where
    E: Executor<'e, Database = Sqlite>,
{
    if start_time >= end_time {
        return Err(AppError::Config(format!(
            "{} has an empty working window",
            name
        )));
    }

    let id = sqlx::query(
        "INSERT INTO resource (name, category, start_time, end_time) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(category)
    .bind(start_time)
    .bind(end_time)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?
    .last_insert_rowid();

    Ok(Resource {
        id,
        name: name.to_string(),
        category: category.to_string(),
        start_time,
        end_time,
    })
}

/// Seed the default doctors into an empty store. Returns how many were added.
pub async fn seed_default_resources(pool: &SqlitePool) -> Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resource")
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;

    if existing > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;
    for (name, category, (open_h, open_m), (close_h, close_m)) in DEFAULT_RESOURCES {
        let start = clock(open_h, open_m)?;
        let end = clock(close_h, close_m)?;
        insert_resource(&mut *tx, name, category, start, end).await?;
    }
    tx.commit().await.map_err(map_sqlx_error)?;

    info!(count = DEFAULT_RESOURCES.len(), "Seeded default doctors");
    Ok(DEFAULT_RESOURCES.len())
}

fn clock(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::Internal(format!("invalid clock time {}:{:02}", hour, minute)))
}
