// Port Layer - Interfaces for external dependencies

pub mod booking_repository;
pub mod time_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use booking_repository::BookingRepository;
pub use time_provider::TimeProvider;
pub use transaction::{BookingTransaction, Transaction, TransactionalBookingRepository};
