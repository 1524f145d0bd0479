// Scheduling constants (No magic values)
use std::time::Duration;

/// Maximum ACTIVE bookings per doctor per day (5)
pub const DEFAULT_DAILY_LIMIT: u32 = 5;

/// Upper bound on waiting for the engine lock (5s)
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Gap between arrivals in the preemption simulation (100ms)
pub const DEFAULT_SIMULATION_STAGGER: Duration = Duration::from_millis(100);
