//! Preemption simulation
//!
//! Fires near-simultaneous bookings for one slot from independent tasks:
//! REGULAR, REGULAR, VIP, EMERGENCY, arriving in that order `stagger` apart
//! (offsets 0, 1, 3 and 5 × stagger). Because the engine serializes every
//! operation, the outcome depends only on arrival order: the second REGULAR is
//! rejected, VIP replaces the first REGULAR, EMERGENCY replaces VIP.

use crate::application::{BookingRequest, SchedulingEngine};
use crate::domain::{Booking, BookingId, Priority, ResourceId};
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One simulated request and what happened to it
#[derive(Debug)]
pub struct SimulationAttempt {
    pub requester_name: String,
    pub priority: Priority,
    pub outcome: Result<BookingId>,
}

/// Outcome of a simulation run
#[derive(Debug)]
pub struct SimulationReport {
    /// In arrival order
    pub attempts: Vec<SimulationAttempt>,
    /// ACTIVE bookings after every task finished, in queue order
    pub active: Vec<Booking>,
}

const SCENARIO: [(&str, Priority, u32); 4] = [
    ("User1-Regular", Priority::Regular, 0),
    ("User2-Regular", Priority::Regular, 1),
    ("User3-VIP", Priority::Vip, 3),
    ("User4-Emergency", Priority::Emergency, 5),
];

/// Run the four-request scenario against `engine`.
pub async fn simulate_preemption(
    engine: Arc<SchedulingEngine>,
    resource_id: ResourceId,
    date: NaiveDate,
    slot: &str,
    stagger: Duration,
) -> Result<SimulationReport> {
    info!(resource_id, date = %date, slot, "Simulating concurrent bookings");

    let handles: Vec<_> = SCENARIO
        .iter()
        .map(|&(name, priority, offset)| {
            let engine = Arc::clone(&engine);
            let req = BookingRequest {
                resource_id,
                requester_name: name.to_string(),
                date,
                slot: slot.to_string(),
                priority,
            };
            tokio::spawn(async move {
                tokio::time::sleep(stagger * offset).await;
                let outcome = engine.book(req).await;
                info!(requester = name, %priority, ok = outcome.is_ok(), "Simulated booking finished");
                SimulationAttempt {
                    requester_name: name.to_string(),
                    priority,
                    outcome,
                }
            })
        })
        .collect();

    let mut attempts = Vec::with_capacity(handles.len());
    for joined in futures::future::join_all(handles).await {
        attempts.push(joined.map_err(|e| AppError::Internal(format!("simulation task failed: {e}")))?);
    }

    let active = engine.list_active().await?;
    Ok(SimulationReport { attempts, active })
}
