// Resource & Requester Domain Models

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Resource ID (assigned by the store)
pub type ResourceId = i64;

/// Requester ID (assigned by the store)
pub type RequesterId = i64;

/// A schedulable doctor with a fixed daily working window `[start_time, end_time)`.
/// Created by seeding; never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub category: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Resource {
    pub fn working_hours(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// The patient on whose behalf bookings are made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: RequesterId,
    pub name: String,
}
