// Central Error Type for the Application

use crate::domain::{BookingId, DomainError, Priority, ResourceId};
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

/// Application-level error type
///
/// Every variant is terminal for the single operation that produced it; the
/// engine never retries. Rejections are raised before any store mutation, and
/// `Database` failures roll the whole operation back.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Unknown doctor: {0}")]
    UnknownResource(ResourceId),

    #[error("Patient name cannot be empty")]
    InvalidRequester,

    #[error("Cannot book {date}: date is in the past (today is {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("Time slot {slot} is outside working hours {working_hours}")]
    OutsideWorkingHours { slot: String, working_hours: String },

    #[error("Slot already booked by appointment {booking_id} ({priority})")]
    SlotAlreadyBooked {
        booking_id: BookingId,
        priority: Priority,
    },

    #[error("Appointments limit exceeded (max {limit} per doctor per day)")]
    DailyLimitExceeded { limit: u32 },

    #[error("No active appointment found with id {0}")]
    NotFound(BookingId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Scheduler busy: lock not acquired within {0:?}")]
    Busy(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Flat error taxonomy, convenient for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownResource,
    InvalidRequester,
    InvalidSlotFormat,
    InvalidPriority,
    PastDate,
    OutsideWorkingHours,
    SlotAlreadyBooked,
    DailyLimitExceeded,
    NotFound,
    InvalidState,
    StorageFailure,
    Busy,
    Config,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(DomainError::InvalidSlotFormat(_)) => ErrorKind::InvalidSlotFormat,
            AppError::Domain(DomainError::InvalidPriority(_)) => ErrorKind::InvalidPriority,
            AppError::Domain(DomainError::InvalidStateTransition { .. }) => ErrorKind::InvalidState,
            AppError::UnknownResource(_) => ErrorKind::UnknownResource,
            AppError::InvalidRequester => ErrorKind::InvalidRequester,
            AppError::PastDate { .. } => ErrorKind::PastDate,
            AppError::OutsideWorkingHours { .. } => ErrorKind::OutsideWorkingHours,
            AppError::SlotAlreadyBooked { .. } => ErrorKind::SlotAlreadyBooked,
            AppError::DailyLimitExceeded { .. } => ErrorKind::DailyLimitExceeded,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Database(_) => ErrorKind::StorageFailure,
            AppError::Busy(_) => ErrorKind::Busy,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)
