// Medslot Infrastructure - SQLite Adapter
// Implements: BookingRepository, TransactionalBookingRepository

mod booking_repository;
mod connection;
mod error;
mod migration;
mod queries;
mod seed;
mod transaction;

pub use booking_repository::SqliteBookingRepository;
pub use connection::create_pool;
pub use migration::run_migrations;
pub use seed::{insert_resource, seed_default_resources};
pub use transaction::SqliteBookingTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
