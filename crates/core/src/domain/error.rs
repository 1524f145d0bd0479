// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid time slot '{0}': expected H:MM-H:MM with start before end")]
    InvalidSlotFormat(String),

    #[error("Invalid priority '{0}': expected emergency, vip or regular")]
    InvalidPriority(String),

    #[error("Invalid booking state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
