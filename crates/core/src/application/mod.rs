// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod scheduling;
pub mod simulation;

// Re-exports
pub use scheduling::{BookingRequest, CancelOutcome, EngineConfig, SchedulingEngine};
pub use simulation::{simulate_preemption, SimulationAttempt, SimulationReport};
